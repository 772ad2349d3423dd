//! Flag unusual points in a univariate time series.
//!
//! Each point is compared with the mean and sample standard deviation of the
//! trailing window ending at it; points whose z-score exceeds a threshold are
//! flagged. See [`engine::analyze`] for the core computation.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod generate;
pub mod loader;
pub mod manager;
pub mod model;
pub mod stats;

pub use engine::analyze;
pub use error::InvalidInputError;
pub use model::{AnalysisResult, Params, Record, Sample, ScoreRecord, WindowPolicy, WindowStats};
