use crate::analysis::{Summary, rank_anomalies};
use crate::model::AnalysisResult;
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

#[derive(Serialize)]
struct ResultRow {
    timestamp: String,
    value: f64,
    rolling_mean: Option<f64>,
    rolling_std: Option<f64>,
    z_score: Option<f64>,
    is_anomaly: bool,
    upper_bound: Option<f64>,
    lower_bound: Option<f64>,
}

#[derive(Serialize)]
struct AnomalyRow {
    timestamp: String,
    value: f64,
    z_score: f64,
    rolling_mean: Option<f64>,
}

/// Write every record of a result as a CSV table.
///
/// Undefined statistics are written as empty cells.
pub fn write_results<T: Display, P: AsRef<Path>>(
    file: P,
    result: &AnalysisResult<T>,
) -> Result<()> {
    let mut writer = create_writer(file.as_ref(), true)?;
    for rec in result.iter() {
        let row = ResultRow {
            timestamp: rec.timestamp.to_string(),
            value: rec.value,
            rolling_mean: rec.rolling_mean,
            rolling_std: rec.rolling_std,
            z_score: rec.z_score,
            is_anomaly: rec.is_anomaly,
            upper_bound: rec.upper_bound,
            lower_bound: rec.lower_bound,
        };
        writer.serialize(row).context("failed to serialize result row")?;
    }
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

/// Write the anomalies of a result as a CSV table, largest `|z|` first.
pub fn write_anomalies<T: Display, P: AsRef<Path>>(
    file: P,
    result: &AnalysisResult<T>,
) -> Result<()> {
    // Header is written explicitly so that an empty table still has one.
    let mut writer = create_writer(file.as_ref(), false)?;
    writer
        .write_record(["timestamp", "value", "z_score", "rolling_mean"])
        .context("failed to write header")?;
    for (index, z_score) in rank_anomalies(result) {
        let rec = &result.records()[index];
        let row = AnomalyRow {
            timestamp: rec.timestamp.to_string(),
            value: rec.value,
            z_score,
            rolling_mean: rec.rolling_mean,
        };
        writer.serialize(row).context("failed to serialize anomaly row")?;
    }
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

/// Write a run summary as pretty-printed JSON.
pub fn write_summary<P: AsRef<Path>>(file: P, summary: &Summary) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary).context("failed to serialize summary")?;
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

fn create_writer(file: &Path, has_headers: bool) -> Result<csv::Writer<BufWriter<File>>> {
    let handle = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    Ok(csv::WriterBuilder::new()
        .has_headers(has_headers)
        .from_writer(BufWriter::new(handle)))
}
