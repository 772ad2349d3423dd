use serde::{Deserialize, Serialize};

/// Ratio of removed to remaining squared deviations above which a removal
/// is considered to have cancelled most significant digits.
const CANCELLATION_RATIO: f64 = 1e3;

/// Running mean and sum of squared deviations over a multiset of values.
///
/// Values can be added and removed in O(1), which lets a trailing window
/// slide along a series without revisiting its contents.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    /// Sample standard deviation, undefined for fewer than two values.
    pub std_dev: Option<f64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an accumulator from scratch with a two-pass computation.
    pub fn from_slice(vals: &[f64]) -> Self {
        let Some(mean) = compute_mean(vals) else {
            return Self::new();
        };
        Self {
            n_vals: vals.len(),
            mean,
            diff_2_sum: compute_diff_2_sum(vals, mean),
        }
    }

    pub fn len(&self) -> usize {
        self.n_vals
    }

    pub fn is_empty(&self) -> bool {
        self.n_vals == 0
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    /// Remove a value previously passed to [`Accumulator::add`].
    ///
    /// Returns `true` when the removed value dominated the spread, in which
    /// case the remaining sums carry large rounding error and the accumulator
    /// should be rebuilt with [`Accumulator::from_slice`].
    pub fn remove(&mut self, val: f64) -> bool {
        if self.n_vals <= 1 {
            *self = Self::new();
            return false;
        }
        self.n_vals -= 1;

        let diff_a = val - self.mean;
        self.mean -= diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        let removed = diff_a * diff_b;
        self.diff_2_sum -= removed;
        // Rounding can push the sum slightly below zero.
        self.diff_2_sum = self.diff_2_sum.max(0.0);

        removed > CANCELLATION_RATIO * self.diff_2_sum
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            n_vals: self.n_vals,
            mean: self.mean,
            std_dev: if self.n_vals > 1 {
                Some((self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt())
            } else {
                None
            },
        }
    }
}

/// Arithmetic mean, undefined for an empty slice.
pub fn compute_mean(vals: &[f64]) -> Option<f64> {
    if vals.is_empty() {
        return None;
    }
    Some(vals.iter().sum::<f64>() / vals.len() as f64)
}

/// Sample variance (denominator `n - 1`), undefined for fewer than two values.
pub fn compute_var(vals: &[f64]) -> Option<f64> {
    let n_vals = vals.len();
    if n_vals < 2 {
        return None;
    }
    let mean = compute_mean(vals)?;
    Some(compute_diff_2_sum(vals, mean) / (n_vals - 1) as f64)
}

fn compute_diff_2_sum(vals: &[f64], mean: f64) -> f64 {
    vals.iter().map(|&val| (val - mean).powi(2)).sum()
}
