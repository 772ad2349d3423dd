use crate::model::{Params, WindowPolicy};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Tool configuration.
///
/// Loaded from a TOML file and validated before use. Every section and
/// field is optional and falls back to its default.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub detection: DetectionConfig,
    pub output: OutputConfig,
    pub generate: GenerateConfig,
}

/// Location and layout of the input data.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Glob pattern of the input files, relative to the working directory.
    pub pattern: String,
    /// Name of the timestamp column.
    pub timestamp_column: String,
    /// Name of the value column.
    pub value_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pattern: "data.csv".to_string(),
            timestamp_column: "timestamp".to_string(),
            value_column: "value".to_string(),
        }
    }
}

/// Detection parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    /// Number of samples in the rolling window.
    pub window_size: usize,
    /// Z-score above which a point is flagged.
    pub threshold: f64,
    /// Handling of windows near the start of the series.
    pub window_policy: WindowPolicy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            threshold: 2.5,
            window_policy: WindowPolicy::Full,
        }
    }
}

impl DetectionConfig {
    pub fn params(&self) -> Params {
        Params::new(self.window_size, self.threshold).with_window_policy(self.window_policy)
    }
}

/// Export options.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Number of anomalies listed in the summary.
    pub top_anomalies: usize,
    /// Write a separate table holding only the anomalies.
    pub write_anomalies: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_anomalies: 5,
            write_anomalies: true,
        }
    }
}

/// Sample data generation parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Number of hourly points.
    pub n_points: usize,
    /// First day of the series (`YYYY-MM-DD`).
    pub start_date: String,
    /// Inject spikes and drifts.
    pub include_anomalies: bool,
    /// Seed of the random number generator.
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            n_points: 500,
            start_date: "2024-01-01".to_string(),
            include_anomalies: true,
            seed: 42,
        }
    }
}

impl GenerateConfig {
    pub fn start_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d")
            .with_context(|| format!("failed to parse start date {:?}", self.start_date))
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded.
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a [`Config`] from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.pattern.trim().is_empty() {
            bail!("input pattern must not be empty");
        }
        if self.input.timestamp_column == self.input.value_column {
            bail!("timestamp and value columns must differ");
        }

        self.detection.params().validate()?;
        check_num(self.detection.window_size, 1..1_000_000).context("invalid window size")?;
        check_num(self.detection.threshold, ..=100.0).context("invalid threshold")?;

        check_num(self.output.top_anomalies, 0..=1000).context("invalid number of top anomalies")?;

        check_num(self.generate.n_points, 2..=10_000_000).context("invalid number of points")?;
        self.generate.start_date().context("invalid start date")?;

        Ok(())
    }
}

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
