//! Fit model registry.
//!
//! Each spectrum model is a tagged configuration: a [`FitModelKind`]
//! paired with a pure shape function, a parameter count, default
//! parameter names, and a start-value/limit strategy driven by histogram
//! statistics. Model dispatch goes through the [`ModelSpec`] lookup
//! instead of a class hierarchy, so an external fitter only ever sees a
//! plain function and a parameter collection.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecFitError};
use crate::histogram::Hist1D;
use crate::parameters::{Parameter, Parameters};

pub mod shapes;

/// Fraction of the maximum used to pick the default Gaussian fit range.
const GAUSS_RANGE_THRESHOLD: f64 = 0.01;

/// The available spectrum fit models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitModelKind {
    /// Plain Gaussian peak.
    Gaussian,
    /// Single Landau peak.
    Landau,
    /// Crystal Ball (Gaussian core, power-law tail).
    CrystalBall,
    /// Landau-Gaussian convolution.
    Langau,
    /// Error-function turn-on glued to a Landau.
    ErfLandau,
    /// Exponential decay towards an asymptote.
    Exponential,
    /// Sum of n Landau peaks.
    NLandau(usize),
}

/// A model's static configuration: identity, parameter layout, and shape
/// function.
#[derive(Clone)]
pub struct ModelSpec {
    pub kind: FitModelKind,
    pub name: &'static str,
    pub n_params: usize,
    pub par_names: Vec<String>,
    pub eval: fn(f64, &[f64]) -> f64,
}

impl FitModelKind {
    /// The lookup entry for this model.
    pub fn spec(&self) -> ModelSpec {
        let (name, par_names, eval): (&'static str, Vec<String>, fn(f64, &[f64]) -> f64) =
            match *self {
                FitModelKind::Gaussian => (
                    "gauss",
                    names(&["constant", "mean", "sigma"]),
                    shapes::gaussian,
                ),
                FitModelKind::Landau => (
                    "landau",
                    names(&["constant", "mpv", "sigma"]),
                    shapes::landau_peak,
                ),
                FitModelKind::CrystalBall => (
                    "crystalball",
                    names(&["c", "alpha", "n", "mean", "sigma", "offset"]),
                    shapes::crystal_ball_shape,
                ),
                FitModelKind::Langau => (
                    "langau",
                    names(&["width", "mpv", "area", "gsigma"]),
                    shapes::langau,
                ),
                FitModelKind::ErfLandau => (
                    "erfland",
                    names(&[
                        "landau_scale",
                        "mpv",
                        "sigma",
                        "erf_scale",
                        "xoff",
                        "width",
                        "offset",
                        "x0",
                    ]),
                    shapes::erf_landau,
                ),
                FitModelKind::Exponential => (
                    "expo",
                    names(&["asymptote", "start_value", "start_time", "time_constant"]),
                    shapes::exponential,
                ),
                FitModelKind::NLandau(n) => {
                    let mut par_names = Vec::with_capacity(3 * n);
                    for i in 0..n {
                        par_names.push(format!("c{}", i));
                        par_names.push(format!("mpv{}", i));
                        par_names.push(format!("sigma{}", i));
                    }
                    ("nlandau", par_names, shapes::n_landau)
                }
            };
        ModelSpec {
            kind: *self,
            name,
            n_params: par_names.len(),
            par_names,
            eval,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn n_params(&self) -> usize {
        self.spec().n_params
    }

    /// Evaluate the model's shape function.
    pub fn eval(&self, x: f64, pars: &[f64]) -> f64 {
        (self.spec().eval)(x, pars)
    }

    /// Default fit range on a histogram.
    ///
    /// The Gaussian trims to the region above 1% of the maximum, the
    /// Langau covers 0.1 to 3 times the spectrum mean; everything else
    /// fits the full axis.
    pub fn default_range(&self, hist: &Hist1D) -> [f64; 2] {
        let full = [hist.x_min(), hist.x_max()];
        match self {
            FitModelKind::Gaussian => {
                let threshold = GAUSS_RANGE_THRESHOLD * hist.maximum();
                match (
                    hist.first_bin_above(threshold),
                    hist.last_bin_above(threshold),
                ) {
                    (Some(lo), Some(hi)) if hi > lo => {
                        [hist.bin_center(lo), hist.bin_center(hi)]
                    }
                    _ => full,
                }
            }
            FitModelKind::Langau => {
                let mean = hist.mean();
                if mean.is_finite() && mean > 0.0 {
                    [0.1 * mean, 3.0 * mean]
                } else {
                    full
                }
            }
            _ => full,
        }
    }

    /// Start values and limits for this model.
    ///
    /// With a histogram the strategy mirrors the per-model limit tables
    /// of the original analysis; without one every parameter starts at 1
    /// and unbounded.
    pub fn default_parameters(&self, hist: Option<&Hist1D>) -> Result<Parameters> {
        let spec = self.spec();
        let hist = match hist {
            Some(h) => h,
            None => {
                let mut params = Parameters::new();
                for name in &spec.par_names {
                    params.add_param(name, 1.0)?;
                }
                return Ok(params);
            }
        };
        if hist.integral() <= 0.0 {
            return Err(SpecFitError::InvalidInput(
                "cannot derive start values from an empty histogram".into(),
            ));
        }

        let max_val = hist.maximum();
        let max_x = hist.x_at_maximum();
        let span = hist.x_max() - hist.x_min();
        let mut params = Parameters::new();

        match *self {
            FitModelKind::Gaussian => {
                let sigma = hist.fwhm_estimate() / crate::math::FWHM_PER_SIGMA;
                params.add_param_with_bounds("constant", max_val, 0.0, 2.0 * max_val)?;
                params.add_param_with_bounds("mean", max_x, hist.x_min(), hist.x_max())?;
                params.add_param_with_bounds("sigma", sigma, 0.0, span)?;
            }
            FitModelKind::Landau => {
                params.add_param("constant", max_val)?;
                params.add_param("mpv", max_x)?;
                params.add_param("sigma", hist.fwhm_estimate() / 4.0)?;
            }
            FitModelKind::CrystalBall => {
                let (mean_lo, mean_hi) = ordered(0.9 * max_x, 1.1 * max_x);
                params.add_param_with_bounds("c", max_val, 1.0, 2.0 * max_val)?;
                params.add_param_with_bounds("alpha", 0.5, 0.1, 10.0)?;
                params.add_param_with_bounds("n", 1.0, 1.0, 50.0)?;
                params.add_param_with_bounds("mean", max_x, mean_lo, mean_hi)?;
                params.add_param_with_bounds("sigma", span / 4.0, 1e-2, span)?;
                params.add_param_with_bounds(
                    "offset",
                    0.0,
                    -0.1 * max_val,
                    0.1 * max_val,
                )?;
            }
            FitModelKind::Langau => {
                let sigma = langau_sigma_estimate(hist, max_x);
                let integral = hist.integral();
                params.add_param_with_bounds("width", sigma / 5.0, 0.0, 0.6 * sigma)?;
                params.add_param_with_bounds("mpv", max_x, 0.5 * max_x, 1.5 * max_x)?;
                params.add_param_with_bounds(
                    "area",
                    500.0 * integral,
                    0.5 * integral,
                    5000.0 * integral,
                )?;
                params.add_param_with_bounds("gsigma", sigma, 0.5 * sigma, 3.0 * sigma)?;
            }
            FitModelKind::ErfLandau => {
                let (mpv_lo, mpv_hi) = ordered(0.9 * max_x, 1.1 * max_x);
                // Distance from the rising edge to the maximum sets the
                // switch point between the erf and Landau branches.
                let rise = hist
                    .first_bin_above(0.1 * max_val)
                    .map(|i| max_x - hist.bin_center(i))
                    .unwrap_or(span / 4.0);
                params.add_param_with_bounds("landau_scale", 5.0 * max_val, 1.0, 10.0 * max_val)?;
                params.add_param_with_bounds("mpv", max_x, mpv_lo, mpv_hi)?;
                params.add_param_with_bounds("sigma", 3.0, 1e-2, span)?;
                params.add_param_with_bounds("erf_scale", max_val / 2.0, 1.0, 10.0 * max_val)?;
                params.add_param_with_bounds("xoff", 0.5, 1.0, 1.5 * max_x)?;
                params.add_param_with_bounds("width", 0.5, 0.1, 1.0)?;
                params.add_param_with_bounds("offset", 0.0, -10.0, 10.0)?;
                params.add(Parameter::fixed("x0", max_x - 0.4 * rise))?;
            }
            FitModelKind::Exponential => {
                let contents = hist.contents();
                let y_first = contents.first().copied().unwrap_or(0.0);
                let y_last = contents.last().copied().unwrap_or(0.0);
                let amplitude = max_val - contents.iter().copied().fold(f64::INFINITY, f64::min);
                let sign = (y_first - y_last).signum();
                params.add_param("asymptote", y_last - sign * amplitude / 2.0)?;
                params.add_param("start_value", sign * y_first)?;
                params.add_param("start_time", hist.bin_center(0))?;
                params.add_param("time_constant", span / 2.0)?;
            }
            FitModelKind::NLandau(n) => {
                let w = hist.fwhm_estimate() / 2.0;
                let lo = max_x - w;
                // n + 1 fence posts over [mpv - w, mpv + w]; component i is
                // confined between posts i and i + 1.
                let post = |i: usize| lo + 2.0 * w * i as f64 / n as f64;
                for i in 0..n {
                    params.add_param_with_bounds(
                        &format!("c{}", i),
                        max_val,
                        0.2 * max_val,
                        5.0 * max_val,
                    )?;
                    params.add_param_with_bounds(
                        &format!("mpv{}", i),
                        max_x + (3.0 * i as f64 - 1.0) * w / 2.0,
                        post(i),
                        post(i + 1),
                    )?;
                    params.add_param_with_bounds(
                        &format!("sigma{}", i),
                        w,
                        0.3 * w,
                        1.5 * w,
                    )?;
                }
            }
        }
        Ok(params)
    }
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Gaussian-sigma estimate for the Langau start values: the spread of the
/// spectrum within 0.7 to 1.3 times the maximum position.
fn langau_sigma_estimate(hist: &Hist1D, max_x: f64) -> f64 {
    let sigma = hist.std_dev_in_range(0.7 * max_x, 1.3 * max_x);
    if sigma.is_finite() && sigma > 0.0 {
        sigma
    } else {
        hist.fwhm_estimate() / crate::math::FWHM_PER_SIGMA
    }
}
