//! Lightweight 1-D histogram.
//!
//! [`Hist1D`] is the binned-data view consumed by the model start-value
//! and limit strategies and by external fitters: per-bin content, entry
//! count, and axis edges, with the handful of statistics the fit setup
//! needs (maximum bin, integral, mean, threshold crossings). It is a data
//! container, not a plotting object.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::binning::BinSpec;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    edges: Vec<f64>,
    contents: Vec<f64>,
    entries: u64,
}

impl Hist1D {
    /// An empty histogram over the given binning.
    pub fn new(spec: &BinSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            edges: spec.edges.clone(),
            contents: vec![0.0; spec.n_bins],
            entries: 0,
        })
    }

    /// Fill a histogram over the given binning from raw samples.
    /// Samples outside the axis range are dropped.
    pub fn from_samples(spec: &BinSpec, values: &Array1<f64>) -> Result<Self> {
        let mut h = Self::new(spec)?;
        for &v in values {
            h.fill(v);
        }
        Ok(h)
    }

    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, weight: f64) {
        if let Some(i) = self.find_bin(x) {
            self.contents[i] += weight;
            self.entries += 1;
        }
    }

    /// Bin index containing `x`; bins are half-open `[low, high)` except
    /// the last, which includes its upper edge.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < self.x_min() || x > self.x_max() {
            return None;
        }
        let i = self.edges.partition_point(|&e| e <= x);
        Some(i.saturating_sub(1).min(self.n_bins() - 1))
    }

    pub fn n_bins(&self) -> usize {
        self.contents.len()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn x_min(&self) -> f64 {
        self.edges[0]
    }

    pub fn x_max(&self) -> f64 {
        *self.edges.last().expect("validated edges")
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        0.5 * (self.edges[i] + self.edges[i + 1])
    }

    pub fn bin_width(&self, i: usize) -> f64 {
        self.edges[i + 1] - self.edges[i]
    }

    pub fn centers(&self) -> Array1<f64> {
        (0..self.n_bins()).map(|i| self.bin_center(i)).collect()
    }

    /// Largest bin content.
    pub fn maximum(&self) -> f64 {
        self.contents.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the largest bin (first one on ties).
    pub fn maximum_bin(&self) -> usize {
        let mut best = 0;
        for (i, &c) in self.contents.iter().enumerate() {
            if c > self.contents[best] {
                best = i;
            }
        }
        best
    }

    /// Center of the largest bin.
    pub fn x_at_maximum(&self) -> f64 {
        self.bin_center(self.maximum_bin())
    }

    /// Sum of bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Content-weighted mean of the bin centers.
    pub fn mean(&self) -> f64 {
        let total = self.integral();
        if total <= 0.0 {
            return f64::NAN;
        }
        (0..self.n_bins())
            .map(|i| self.bin_center(i) * self.contents[i])
            .sum::<f64>()
            / total
    }

    /// Content-weighted standard deviation of the bin centers within
    /// `[low, high]`; NaN when the window holds no content.
    pub fn std_dev_in_range(&self, low: f64, high: f64) -> f64 {
        let mut sum = 0.0;
        let mut sum_x = 0.0;
        let mut sum_xx = 0.0;
        for i in 0..self.n_bins() {
            let c = self.bin_center(i);
            if c < low || c > high {
                continue;
            }
            let w = self.contents[i];
            sum += w;
            sum_x += w * c;
            sum_xx += w * c * c;
        }
        if sum <= 0.0 {
            return f64::NAN;
        }
        let mean = sum_x / sum;
        (sum_xx / sum - mean * mean).max(0.0).sqrt()
    }

    /// First bin whose content exceeds `threshold`.
    pub fn first_bin_above(&self, threshold: f64) -> Option<usize> {
        self.contents.iter().position(|&c| c > threshold)
    }

    /// Last bin whose content exceeds `threshold`.
    pub fn last_bin_above(&self, threshold: f64) -> Option<usize> {
        self.contents
            .iter()
            .rposition(|&c| c > threshold)
    }

    /// Coarse FWHM estimate from the centers of the outermost bins above
    /// half the maximum content.
    pub fn fwhm_estimate(&self) -> f64 {
        let half = self.maximum() / 2.0;
        match (self.first_bin_above(half), self.last_bin_above(half)) {
            (Some(lo), Some(hi)) if hi > lo => self.bin_center(hi) - self.bin_center(lo),
            _ => self.bin_width(self.maximum_bin()),
        }
    }
}
