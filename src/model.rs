//! Detection data types.

use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};

/// Single observation of the series.
///
/// The timestamp is opaque to the engine: it only has to be ordered and is
/// carried through to the output unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    pub timestamp: T,
    pub value: f64,
}

impl<T> Sample<T> {
    pub fn new(timestamp: T, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Rule deciding when a trailing window yields defined statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Only windows holding exactly `window_size` samples are used.
    #[default]
    Full,
    /// Windows near the start of the series use whatever samples exist.
    Partial,
}

/// Detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub window_size: usize,
    pub threshold: f64,
    pub window_policy: WindowPolicy,
}

impl Params {
    /// Parameters with the default [`WindowPolicy::Full`].
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
            window_policy: WindowPolicy::Full,
        }
    }

    pub fn with_window_policy(mut self, window_policy: WindowPolicy) -> Self {
        self.window_policy = window_policy;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if self.window_size == 0 {
            return Err(InvalidInputError::InvalidWindowSize(self.window_size));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(InvalidInputError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Statistics of the trailing window ending at one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub mean: f64,
    /// Sample standard deviation, undefined for windows of a single sample.
    pub std_dev: Option<f64>,
}

/// Classification of one index against its window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Undefined when the window is not ready or has zero spread.
    pub z_score: Option<f64>,
    pub is_anomaly: bool,
}

/// Output row, aligned with the input sample at the same index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub timestamp: T,
    pub value: f64,
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub z_score: Option<f64>,
    pub is_anomaly: bool,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
}

/// Result of a detection run: one [`Record`] per input sample, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult<T> {
    params: Params,
    records: Vec<Record<T>>,
}

impl<T> AnalysisResult<T> {
    pub(crate) fn new(params: Params, records: Vec<Record<T>>) -> Self {
        Self { params, records }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record<T>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record<T>> {
        self.records.iter()
    }

    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, rec)| rec.is_anomaly)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn n_anomalies(&self) -> usize {
        self.records.iter().filter(|rec| rec.is_anomaly).count()
    }

    pub fn rolling_mean(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|rec| rec.rolling_mean).collect()
    }

    pub fn rolling_std(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|rec| rec.rolling_std).collect()
    }

    pub fn z_scores(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|rec| rec.z_score).collect()
    }

    pub fn anomaly_flags(&self) -> Vec<bool> {
        self.records.iter().map(|rec| rec.is_anomaly).collect()
    }
}
