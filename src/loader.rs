use crate::model::Sample;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::{fs::File, io::BufReader, path::Path};

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Series read from a CSV file, sorted and gap-free.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub samples: Vec<Sample<NaiveDateTime>>,
    /// Number of missing values that were filled in.
    pub n_filled: usize,
}

/// Load a series from a headed CSV file.
///
/// Rows are sorted by timestamp. Missing or non-numeric values are
/// forward-filled, then backward-filled.
///
/// # Errors
/// Returns an error if the file cannot be read, a column is missing,
/// a timestamp cannot be parsed, every value is missing,
/// or fewer than two rows remain.
pub fn load_series<P: AsRef<Path>>(
    file: P,
    timestamp_column: &str,
    value_column: &str,
) -> Result<LoadedSeries> {
    let file = file.as_ref();
    let reader = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(reader));

    let headers = reader.headers().context("failed to read header")?.clone();
    let find_column = |name: &str| {
        headers.iter().position(|header| header.trim() == name).with_context(|| {
            let available: Vec<_> = headers.iter().collect();
            format!("column {name:?} not found, available columns: {available:?}")
        })
    };
    let i_ts = find_column(timestamp_column)?;
    let i_val = find_column(value_column)?;

    let mut rows = Vec::new();
    for (i_row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {i_row}"))?;
        let ts_field = record.get(i_ts).unwrap_or_default();
        let timestamp = parse_timestamp(ts_field)
            .with_context(|| format!("failed to parse timestamp in row {i_row}"))?;
        let value = record.get(i_val).and_then(parse_value);
        rows.push((timestamp, value));
    }

    if rows.len() < 2 {
        bail!("series must have at least 2 rows, but has {}", rows.len());
    }

    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let (timestamps, mut values): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    let n_filled = fill_missing(&mut values)?;
    if n_filled > 0 {
        log::warn!("filled {n_filled} missing values in {file:?}");
    }

    let samples = timestamps
        .into_iter()
        .zip(values)
        .map(|(timestamp, value)| Sample::new(timestamp, value.unwrap_or_default()))
        .collect();

    Ok(LoadedSeries { samples, n_filled })
}

/// Parse a timestamp in RFC 3339 or a common date/time layout.
pub fn parse_timestamp(field: &str) -> Result<NaiveDateTime> {
    let field = field.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(field) {
        return Ok(date_time.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(field, format) {
            return Ok(date_time);
        }
    }
    let date = NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .with_context(|| format!("unrecognized timestamp {field:?}"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

fn parse_value(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Forward-fill, then backward-fill missing values.
///
/// Returns the number of values that were missing.
pub fn fill_missing(values: &mut [Option<f64>]) -> Result<usize> {
    let n_missing = values.iter().filter(|value| value.is_none()).count();
    if n_missing == 0 {
        return Ok(0);
    }
    if n_missing == values.len() {
        bail!("all values are missing");
    }

    let mut last = None;
    for value in values.iter_mut() {
        match value {
            Some(val) => last = Some(*val),
            None => *value = last,
        }
    }

    let mut next = None;
    for value in values.iter_mut().rev() {
        match value {
            Some(val) => next = Some(*val),
            None => *value = next,
        }
    }

    Ok(n_missing)
}
