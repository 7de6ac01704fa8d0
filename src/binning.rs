//! Data-driven histogram binning estimation.
//!
//! Pure helper functions that pick bin widths and axis ranges from raw
//! samples before a histogram is filled: Freedman-Diaconis bin widths with
//! a sigma-based fallback for discrete data, quantile-trimmed ranges, and
//! an equal-width [`BinSpec`] builder. Degenerate inputs resolve to
//! documented fallbacks instead of errors wherever the output is still
//! usable.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SpecFitError};

/// An equal- or variable-width binning of a 1-D axis.
///
/// Invariant: `edges` is strictly increasing and `n_bins == edges.len() - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    /// Number of bins.
    pub n_bins: usize,
    /// Bin edges (length `n_bins + 1`).
    pub edges: Vec<f64>,
}

impl BinSpec {
    /// Build from explicit edges.
    pub fn from_edges(edges: Vec<f64>) -> Result<Self> {
        let spec = Self {
            n_bins: edges.len().saturating_sub(1),
            edges,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Equal-width bins from `x_min` stepping by `width` until `x_max` is
    /// covered; the last edge lands on or beyond `x_max`.
    pub fn with_width(x_min: f64, x_max: f64, width: f64) -> Result<Self> {
        if !(width > 0.0) || !width.is_finite() {
            return Err(SpecFitError::InvalidInput(format!(
                "bin width must be positive and finite, got {}",
                width
            )));
        }
        if !(x_max > x_min) {
            return Err(SpecFitError::InvalidInput(format!(
                "empty axis range [{}, {}]",
                x_min, x_max
            )));
        }
        let n_edges = ((x_max + width - x_min) / width).ceil() as usize;
        let edges: Vec<f64> = (0..n_edges.max(2))
            .map(|i| x_min + i as f64 * width)
            .collect();
        Self::from_edges(edges)
    }

    /// `n` equal-width bins spanning `[x_min, x_max]` exactly.
    pub fn with_count(x_min: f64, x_max: f64, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SpecFitError::InvalidInput("need at least one bin".into()));
        }
        if !(x_max > x_min) {
            return Err(SpecFitError::InvalidInput(format!(
                "empty axis range [{}, {}]",
                x_min, x_max
            )));
        }
        let w = (x_max - x_min) / n as f64;
        let mut edges: Vec<f64> = (0..n).map(|i| x_min + i as f64 * w).collect();
        edges.push(x_max);
        Self::from_edges(edges)
    }

    /// Check the strictly-increasing-edges invariant.
    pub fn validate(&self) -> Result<()> {
        if self.edges.len() < 2 {
            return Err(SpecFitError::InvalidInput(
                "a binning needs at least two edges".into(),
            ));
        }
        if self.n_bins != self.edges.len() - 1 {
            return Err(SpecFitError::DimensionMismatch(format!(
                "n_bins = {} does not match {} edges",
                self.n_bins,
                self.edges.len()
            )));
        }
        if self.edges.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SpecFitError::InvalidInput(
                "bin edges must be strictly increasing".into(),
            ));
        }
        Ok(())
    }

    pub fn x_min(&self) -> f64 {
        self.edges[0]
    }

    pub fn x_max(&self) -> f64 {
        *self.edges.last().expect("validated edges")
    }

    /// Bin centers.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

fn finite(values: &Array1<f64>) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Linear-interpolation quantile of an unsorted sample, `q` in [0, 1].
/// NaN for an empty sample.
fn quantile_of(mut sample: Vec<f64>, q: f64) -> f64 {
    if sample.is_empty() {
        return f64::NAN;
    }
    sample.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (sample.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 < sample.len() {
        sample[lo] + frac * (sample[lo + 1] - sample[lo])
    } else {
        sample[lo]
    }
}

/// Sample mean and spread (population standard deviation).
pub fn mean_sigma(values: &Array1<f64>) -> (f64, f64) {
    let finite = finite(values);
    if finite.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Freedman-Diaconis bin width, `2 * IQR / n^(1/3)` over the finite values.
/// NaN when there are no finite values.
pub fn freedman_diaconis(values: &Array1<f64>) -> f64 {
    let finite = finite(values);
    let n = finite.len() as f64;
    let iqr = quantile_of(finite.clone(), 0.75) - quantile_of(finite, 0.25);
    2.0 * iqr / n.cbrt()
}

/// Estimated bin width: Freedman-Diaconis, falling back to Scott's
/// sigma-based rule `3.49 * sigma / n^(1/3)` when the IQR collapses to
/// zero (discrete or near-constant data).
pub fn width(values: &Array1<f64>) -> f64 {
    let w = freedman_diaconis(values);
    if w == 0.0 {
        debug!("IQR-based bin width is zero, falling back to sigma-based width");
        let (_, sigma) = mean_sigma(values);
        3.49 * sigma / (values.len() as f64).cbrt()
    } else {
        w
    }
}

/// Estimated bin count covering the full sample span at the estimated
/// width. 0 for degenerate input.
pub fn bin_count(values: &Array1<f64>) -> usize {
    let finite = finite(values);
    let (min, max) = match min_max(&finite) {
        Some(mm) => mm,
        None => return 0,
    };
    ((max - min) / width(values)) as usize
}

fn min_max(sample: &[f64]) -> Option<(f64, f64)> {
    let first = *sample.first()?;
    Some(sample.iter().fold((first, first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    }))
}

/// Expand `[low, high]` by the given fractions of its span on each side.
pub fn expand_range(low: f64, high: f64, low_factor: f64, high_factor: f64) -> [f64; 2] {
    let d = (high - low).abs();
    [low - d * low_factor, high + d * high_factor]
}

/// Quantile-trimmed axis range for a sample.
///
/// Trims to the `[low_quantile, 1 - quantile]` quantiles (the low quantile
/// defaults to `quantile`), then expands by `low_factor`/`high_factor`
/// times the trimmed span on each side. When the two quantiles coincide
/// the literal min/max are used before expanding.
pub fn find_range(
    values: &Array1<f64>,
    low_factor: f64,
    high_factor: f64,
    quantile: f64,
    low_quantile: Option<f64>,
) -> [f64; 2] {
    let finite = finite(values);
    let q_low = quantile_of(finite.clone(), low_quantile.unwrap_or(quantile));
    let q_high = quantile_of(finite.clone(), 1.0 - quantile);
    let (low, high) = if q_low == q_high {
        debug!("trim quantiles coincide, falling back to the literal min/max");
        min_max(&finite).unwrap_or((q_low, q_high))
    } else {
        (q_low, q_high)
    };
    expand_range(low, high, low_factor, high_factor)
}

/// Options for [`find`]; the defaults mirror a 2% quantile trim expanded
/// by 20% on both sides at the estimated width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    pub low_factor: f64,
    pub high_factor: f64,
    pub quantile: f64,
    /// Separate trim quantile for the low side; `quantile` when `None`.
    pub low_quantile: Option<f64>,
    /// Multiplier on the estimated bin width.
    pub width_scale: f64,
    /// Explicit bin width, skipping the estimate.
    pub width: Option<f64>,
    /// Explicit axis range, skipping the quantile trim.
    pub range: Option<[f64; 2]>,
    /// Override for the lower edge.
    pub x_min: Option<f64>,
    /// Override for the upper bound.
    pub x_max: Option<f64>,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            low_factor: 0.2,
            high_factor: 0.2,
            quantile: 0.02,
            low_quantile: None,
            width_scale: 1.0,
            width: None,
            range: None,
            x_min: None,
            x_max: None,
        }
    }
}

/// Estimate an equal-width binning for a sample.
///
/// All-identical input is special-cased to three narrow bins centered on
/// the constant value, so degenerate data still produces a usable
/// histogram axis.
pub fn find(values: &Array1<f64>, options: &FindOptions) -> Result<BinSpec> {
    let finite_values = finite(values);
    if finite_values.is_empty() {
        return Err(SpecFitError::InvalidInput(
            "cannot estimate bins without finite values".into(),
        ));
    }

    let v0 = finite_values[0];
    if finite_values.iter().all(|&v| v == v0) {
        debug!(value = v0, "all samples identical, using synthetic narrow bins");
        // Offsets scale with the value itself; unit scale keeps the edges
        // distinct when the constant is zero.
        let scale = if v0 == 0.0 { 1.0 } else { v0.abs() };
        let edges = [-0.15, -0.05, 0.05, 0.15]
            .iter()
            .map(|o| v0 + o * scale)
            .collect();
        return BinSpec::from_edges(edges);
    }

    let w = match options.width {
        Some(w) => w,
        None => width(values) * options.width_scale,
    };
    let [range_low, range_high] = match options.range {
        Some(r) => r,
        None => find_range(
            values,
            options.low_factor,
            options.high_factor,
            options.quantile,
            options.low_quantile,
        ),
    };
    let x_min = options.x_min.unwrap_or(range_low);
    let x_max = options.x_max.unwrap_or(range_high);
    BinSpec::with_width(x_min, x_max, w)
}
