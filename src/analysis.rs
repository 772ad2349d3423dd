use crate::model::AnalysisResult;
use crate::stats::Accumulator;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Anomaly listed in a [`Summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopAnomaly {
    pub index: usize,
    pub timestamp: String,
    pub value: f64,
    pub z_score: f64,
}

/// Overview of a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub n_points: usize,
    pub n_anomalies: usize,
    /// Percentage of points flagged as anomalous.
    pub anomaly_rate: f64,

    pub window_size: usize,
    pub threshold: f64,

    pub value_min: f64,
    pub value_max: f64,
    pub value_mean: f64,
    pub value_std_dev: Option<f64>,

    /// Range of `|z|` over the flagged points.
    pub abs_z_min: Option<f64>,
    pub abs_z_max: Option<f64>,

    /// Flagged points with the largest `|z|`, in decreasing order.
    pub top_anomalies: Vec<TopAnomaly>,
}

impl Summary {
    pub fn from_result<T: Display>(result: &AnalysisResult<T>, top_n: usize) -> Self {
        let mut acc = Accumulator::new();
        let mut value_min = f64::INFINITY;
        let mut value_max = f64::NEG_INFINITY;
        for rec in result.iter() {
            acc.add(rec.value);
            value_min = value_min.min(rec.value);
            value_max = value_max.max(rec.value);
        }
        let report = acc.report();

        let ranked = rank_anomalies(result);
        let abs_z_max = ranked.first().map(|&(_, z_score)| z_score.abs());
        let abs_z_min = ranked.last().map(|&(_, z_score)| z_score.abs());

        let top_anomalies = ranked
            .iter()
            .take(top_n)
            .map(|&(index, z_score)| {
                let rec = &result.records()[index];
                TopAnomaly {
                    index,
                    timestamp: rec.timestamp.to_string(),
                    value: rec.value,
                    z_score,
                }
            })
            .collect();

        let n_points = result.len();
        let n_anomalies = ranked.len();
        let params = result.params();

        Self {
            n_points,
            n_anomalies,
            anomaly_rate: if n_points > 0 {
                100.0 * n_anomalies as f64 / n_points as f64
            } else {
                0.0
            },
            window_size: params.window_size,
            threshold: params.threshold,
            value_min,
            value_max,
            value_mean: report.mean,
            value_std_dev: report.std_dev,
            abs_z_min,
            abs_z_max,
            top_anomalies,
        }
    }
}

/// Indices and z-scores of flagged points, sorted by decreasing `|z|`.
///
/// Ties keep their original order.
pub fn rank_anomalies<T>(result: &AnalysisResult<T>) -> Vec<(usize, f64)> {
    let mut ranked: Vec<_> = result
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.is_anomaly)
        .filter_map(|(index, rec)| rec.z_score.map(|z_score| (index, z_score)))
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    ranked
}
