use crate::error::InvalidInputError;
use crate::model::{
    AnalysisResult, Params, Record, Sample, ScoreRecord, WindowPolicy, WindowStats,
};
use crate::stats::Accumulator;

/// Flag anomalies in a series using rolling statistics and z-scores.
///
/// The window for index `i` is the inclusive trailing window of at most
/// `params.window_size` samples ending at `i`. Each ready index gets the
/// window mean and sample standard deviation, a z-score when the standard
/// deviation is positive, and an anomaly flag when `|z| > threshold`.
///
/// # Errors
/// Returns an [`InvalidInputError`] if the series is empty, contains a
/// non-finite value or decreasing timestamps, or if the parameters are invalid.
/// Nothing is computed in that case.
pub fn analyze<T>(
    series: &[Sample<T>],
    params: &Params,
) -> Result<AnalysisResult<T>, InvalidInputError>
where
    T: Clone + PartialOrd,
{
    params.validate()?;
    validate_series(series)?;

    let vals: Vec<f64> = series.iter().map(|sample| sample.value).collect();
    let window_stats = compute_window_stats(&vals, params.window_size, params.window_policy);

    let records = series
        .iter()
        .zip(window_stats)
        .map(|(sample, stats)| build_record(sample, stats, params.threshold))
        .collect();

    Ok(AnalysisResult::new(*params, records))
}

fn validate_series<T: PartialOrd>(series: &[Sample<T>]) -> Result<(), InvalidInputError> {
    if series.is_empty() {
        return Err(InvalidInputError::EmptySeries);
    }
    for (index, sample) in series.iter().enumerate() {
        if !sample.value.is_finite() {
            return Err(InvalidInputError::NonFiniteValue {
                index,
                value: sample.value,
            });
        }
    }
    for (index, pair) in series.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(InvalidInputError::UnorderedTimestamps { index: index + 1 });
        }
    }
    Ok(())
}

/// Compute the statistics of every trailing window in a single pass.
///
/// Indices whose window is not ready under `window_policy` get `None`.
pub fn compute_window_stats(
    vals: &[f64],
    window_size: usize,
    window_policy: WindowPolicy,
) -> Vec<Option<WindowStats>> {
    if window_size == 0 {
        return vec![None; vals.len()];
    }

    let mut acc = Accumulator::new();
    let mut run_len = 0;
    let mut stats_vec = Vec::with_capacity(vals.len());

    for (i_val, &val) in vals.iter().enumerate() {
        // Length of the run of identical values ending here.
        run_len = if i_val > 0 && vals[i_val - 1] == val {
            run_len + 1
        } else {
            1
        };

        let mut cancelled = false;
        if i_val >= window_size {
            cancelled = acc.remove(vals[i_val - window_size]);
        }
        acc.add(val);

        // Rebuild once per window length, and whenever a dominant value left.
        if cancelled || (i_val + 1) % window_size == 0 {
            let start = (i_val + 1).saturating_sub(window_size);
            acc = Accumulator::from_slice(&vals[start..=i_val]);
        }

        let n_win = acc.len();
        let ready = match window_policy {
            WindowPolicy::Full => n_win == window_size,
            WindowPolicy::Partial => true,
        };
        if !ready {
            stats_vec.push(None);
            continue;
        }

        // A flat window has exactly zero spread, whatever the accumulator says.
        let stats = if run_len >= n_win {
            WindowStats {
                mean: val,
                std_dev: (n_win > 1).then_some(0.0),
            }
        } else {
            let report = acc.report();
            WindowStats {
                mean: report.mean,
                std_dev: report.std_dev,
            }
        };
        stats_vec.push(Some(stats));
    }

    stats_vec
}

/// Score a value against the statistics of its window.
pub fn score(val: f64, stats: &WindowStats, threshold: f64) -> ScoreRecord {
    let z_score = stats
        .std_dev
        .filter(|&std_dev| std_dev > 0.0)
        .map(|std_dev| (val - stats.mean) / std_dev)
        .filter(|z_score| z_score.is_finite());

    ScoreRecord {
        z_score,
        is_anomaly: z_score.is_some_and(|z_score| z_score.abs() > threshold),
    }
}

fn build_record<T: Clone>(
    sample: &Sample<T>,
    stats: Option<WindowStats>,
    threshold: f64,
) -> Record<T> {
    let Some(stats) = stats else {
        return Record {
            timestamp: sample.timestamp.clone(),
            value: sample.value,
            rolling_mean: None,
            rolling_std: None,
            z_score: None,
            is_anomaly: false,
            upper_bound: None,
            lower_bound: None,
        };
    };

    let score_rec = score(sample.value, &stats, threshold);
    let margin = stats.std_dev.map(|std_dev| threshold * std_dev);

    Record {
        timestamp: sample.timestamp.clone(),
        value: sample.value,
        rolling_mean: Some(stats.mean),
        rolling_std: stats.std_dev,
        z_score: score_rec.z_score,
        is_anomaly: score_rec.is_anomaly,
        upper_bound: margin.map(|margin| stats.mean + margin),
        lower_bound: margin.map(|margin| stats.mean - margin),
    }
}
