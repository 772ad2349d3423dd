use crate::analysis::Summary;
use crate::config::Config;
use crate::engine::analyze;
use crate::export::{write_anomalies, write_results, write_summary};
use crate::generate::{generate_series, write_series};
use crate::loader::load_series;
use crate::model::Params;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = "config.toml";

const RESULTS_SUFFIX: &str = "results.csv";
const ANOMALIES_SUFFIX: &str = "anomalies.csv";
const SUMMARY_SUFFIX: &str = "summary.json";
const OUTPUT_SUFFIXES: [&str; 3] = [RESULTS_SUFFIX, ANOMALIES_SUFFIX, SUMMARY_SUFFIX];

pub struct Manager {
    work_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    /// Open a working directory, reading `config.toml` if it exists.
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let work_dir = work_dir.as_ref().to_path_buf();
        if !work_dir.is_dir() {
            bail!("{work_dir:?} is not a directory");
        }

        let config_file = work_dir.join(CONFIG_FILE);
        let cfg = if config_file.exists() {
            Config::from_file(&config_file).context("failed to construct cfg")?
        } else {
            log::info!("{config_file:?} not found, using defaults");
            Config::default()
        };
        log::info!("{cfg:#?}");

        Ok(Self { work_dir, cfg })
    }

    /// Write a synthetic series to the input file.
    pub fn generate_data(&self) -> Result<()> {
        let pattern = &self.cfg.input.pattern;
        if pattern.contains(['*', '?', '[']) || Path::new(pattern).components().count() != 1 {
            bail!("input pattern must be a plain file name to generate data, but is {pattern:?}");
        }

        let samples = generate_series(&self.cfg.generate).context("failed to generate series")?;

        let data_file = self.work_dir.join(pattern);
        write_series(&data_file, &samples)
            .with_context(|| format!("failed to write {data_file:?}"))?;
        log::info!("wrote {} samples to {data_file:?}", samples.len());

        Ok(())
    }

    /// Analyze every input file, optionally overriding the detection parameters.
    pub fn analyze_data(&self, window_size: Option<usize>, threshold: Option<f64>) -> Result<()> {
        let mut cfg = self.cfg.clone();
        if let Some(window_size) = window_size {
            cfg.detection.window_size = window_size;
        }
        if let Some(threshold) = threshold {
            cfg.detection.threshold = threshold;
        }
        cfg.validate().context("invalid detection parameters")?;
        let params = cfg.detection.params();

        let data_files = self.input_files().context("failed to list input files")?;
        if data_files.is_empty() {
            bail!("no input file matches {:?}", self.cfg.input.pattern);
        }

        for data_file in data_files {
            self.analyze_file(&data_file, &params)
                .with_context(|| format!("failed to analyze {data_file:?}"))?;
        }

        Ok(())
    }

    /// Remove every exported file.
    pub fn clean_outputs(&self) -> Result<()> {
        for suffix in OUTPUT_SUFFIXES {
            for file in self.glob_files(&format!("*.{suffix}"))? {
                fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
                log::info!("removed {file:?}");
            }
        }
        Ok(())
    }

    fn analyze_file(&self, data_file: &Path, params: &Params) -> Result<()> {
        let input = &self.cfg.input;
        let loaded = load_series(data_file, &input.timestamp_column, &input.value_column)
            .context("failed to load series")?;
        log::debug!(
            "loaded {} samples ({} filled) from {data_file:?}",
            loaded.samples.len(),
            loaded.n_filled
        );

        let result = analyze(&loaded.samples, params).context("failed to detect anomalies")?;
        let summary = Summary::from_result(&result, self.cfg.output.top_anomalies);

        write_results(self.output_file(data_file, RESULTS_SUFFIX), &result)
            .context("failed to write results")?;
        if self.cfg.output.write_anomalies {
            write_anomalies(self.output_file(data_file, ANOMALIES_SUFFIX), &result)
                .context("failed to write anomalies")?;
        }
        write_summary(self.output_file(data_file, SUMMARY_SUFFIX), &summary)
            .context("failed to write summary")?;

        log::info!(
            "{data_file:?}: {} anomalies in {} points ({:.2}%)",
            summary.n_anomalies,
            summary.n_points,
            summary.anomaly_rate
        );
        for top in &summary.top_anomalies {
            log::info!(
                "  {}: value={:.2}, z-score={:.2}",
                top.timestamp,
                top.value,
                top.z_score
            );
        }

        Ok(())
    }

    fn input_files(&self) -> Result<Vec<PathBuf>> {
        let files = self
            .glob_files(&self.cfg.input.pattern)?
            .into_iter()
            .filter(|file| !is_output_file(file))
            .collect();
        Ok(files)
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = self.work_dir.join(pattern);
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let files = glob(pattern)
            .context("failed to glob files")?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        Ok(files)
    }

    fn output_file(&self, data_file: &Path, suffix: &str) -> PathBuf {
        let stem = data_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("data");
        self.work_dir.join(format!("{stem}.{suffix}"))
    }
}

fn is_output_file(file: &Path) -> bool {
    file.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            OUTPUT_SUFFIXES
                .iter()
                .any(|suffix| name.ends_with(&format!(".{suffix}")))
        })
}
