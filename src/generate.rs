use crate::config::GenerateConfig;
use crate::model::Sample;
use anyhow::{Context, Result};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use rand::prelude::*;
use rand::seq::index;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Bernoulli, Normal, Uniform};
use serde::Serialize;
use std::{f64::consts::PI, fs::File, io::BufWriter, path::Path};

const BASE_LEVEL: f64 = 50.0;
const TREND_SLOPE: f64 = 0.01;
const SEASONAL_AMPLITUDE: f64 = 5.0;
const SEASONAL_PERIOD: f64 = 24.0;
const NOISE_STD_DEV: f64 = 2.0;
const MAX_DRIFT_LEN: usize = 10;

/// Generate an hourly synthetic series with trend, daily seasonality and noise.
///
/// When anomalies are enabled, about 2% of the points receive a spike of
/// 15 to 30 units up or down, and about 1% start a linear drift of up to
/// 10 points reaching 10 to 20 units.
/// The same configuration always yields the same series.
pub fn generate_series(cfg: &GenerateConfig) -> Result<Vec<Sample<NaiveDateTime>>> {
    let mut rng = ChaCha12Rng::seed_from_u64(cfg.seed);
    let n_points = cfg.n_points;

    let noise_dist = Normal::new(0.0, NOISE_STD_DEV)?;
    let mut vals: Vec<f64> = (0..n_points)
        .map(|t| {
            let t = t as f64;
            let trend = TREND_SLOPE * t;
            let seasonal = SEASONAL_AMPLITUDE * (2.0 * PI * t / SEASONAL_PERIOD).sin();
            BASE_LEVEL + trend + seasonal + noise_dist.sample(&mut rng)
        })
        .collect();

    if cfg.include_anomalies {
        inject_spikes(&mut vals, &mut rng).context("failed to inject spikes")?;
        inject_drifts(&mut vals, &mut rng).context("failed to inject drifts")?;
    }

    let start = cfg.start_date()?.and_time(NaiveTime::MIN);
    let samples = vals
        .into_iter()
        .enumerate()
        .map(|(t, val)| Sample::new(start + TimeDelta::hours(t as i64), val))
        .collect();

    Ok(samples)
}

fn inject_spikes(vals: &mut [f64], rng: &mut ChaCha12Rng) -> Result<()> {
    let n_spikes = vals.len() / 50;
    let up_dist = Bernoulli::new(0.5)?;
    let size_dist = Uniform::new(15.0, 30.0)?;

    for idx in index::sample(rng, vals.len(), n_spikes) {
        let size = size_dist.sample(rng);
        if up_dist.sample(rng) {
            vals[idx] += size;
        } else {
            vals[idx] -= size;
        }
    }

    Ok(())
}

fn inject_drifts(vals: &mut [f64], rng: &mut ChaCha12Rng) -> Result<()> {
    let n_drifts = vals.len() / 100;
    let height_dist = Uniform::new(10.0, 20.0)?;

    for idx in index::sample(rng, vals.len(), n_drifts) {
        let drift_len = MAX_DRIFT_LEN.min(vals.len() - idx);
        let height = height_dist.sample(rng);
        // Linear ramp from 0 to `height`, both ends included.
        let step = if drift_len > 1 {
            height / (drift_len - 1) as f64
        } else {
            0.0
        };
        for (i_step, val) in vals[idx..idx + drift_len].iter_mut().enumerate() {
            *val += step * i_step as f64;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct SeriesRow {
    timestamp: String,
    value: f64,
}

/// Write a series as a `timestamp,value` CSV table.
pub fn write_series<P: AsRef<Path>>(file: P, samples: &[Sample<NaiveDateTime>]) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for sample in samples {
        let row = SeriesRow {
            timestamp: sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            value: sample.value,
        };
        writer.serialize(row).context("failed to serialize sample")?;
    }
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}
