//! Landau-Gaussian convolution ("langau") evaluator.
//!
//! The convolution of a Landau density with a Gaussian models the energy
//! loss of charged particles in a thin absorber as seen by a detector with
//! Gaussian resolution. The evaluator computes the convolution integral at
//! a single x by a fixed-step quadrature over a truncated support window;
//! it is the model function handed to an external least-squares fitter.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{Result, SpecFitError};
use crate::math::{gauss, landau};

/// Offset between the mode of the Landau density and its location
/// parameter, in units of the scale parameter. The location parameter is
/// shifted by this amount so that `mpv` names the true peak position.
pub const MP_SHIFT: f64 = -0.222_782_98;

/// True most probable value of a Landau with the given location parameter
/// and scale, correcting for the mode offset.
pub fn most_probable_value(location: f64, sigma: f64) -> f64 {
    location + MP_SHIFT * sigma
}

/// Shape parameters of the Landau-Gaussian convolution.
///
/// As a parameter slice the order is `[width, mpv, area, gsigma]`:
/// the Landau scale, the most probable value, the total area
/// (normalization), and the sigma of the convolved Gaussian.
///
/// `width` and `gsigma` must be positive and `area` non-negative; the
/// evaluator does not guard against degenerate values, validation is the
/// caller's job (see [`ShapeParameters::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    /// Width (scale) parameter of the Landau density.
    pub width: f64,
    /// Most probable value, i.e. the peak position of the Landau.
    pub mpv: f64,
    /// Total area (integral over the full support).
    pub area: f64,
    /// Sigma of the convolved Gaussian.
    pub gsigma: f64,
}

impl ShapeParameters {
    pub fn new(width: f64, mpv: f64, area: f64, gsigma: f64) -> Self {
        Self {
            width,
            mpv,
            area,
            gsigma,
        }
    }

    /// Build from a `[width, mpv, area, gsigma]` parameter slice, as
    /// supplied by a fitter.
    pub fn from_slice(pars: &[f64]) -> Result<Self> {
        if pars.len() < 4 {
            return Err(SpecFitError::DimensionMismatch(format!(
                "expected 4 shape parameters, got {}",
                pars.len()
            )));
        }
        Ok(Self::new(pars[0], pars[1], pars[2], pars[3]))
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.width, self.mpv, self.area, self.gsigma]
    }

    /// Check the positivity constraints on the shape parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0) {
            return Err(SpecFitError::InvalidParameter(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !(self.gsigma > 0.0) {
            return Err(SpecFitError::InvalidParameter(format!(
                "gsigma must be positive, got {}",
                self.gsigma
            )));
        }
        if !(self.area >= 0.0) {
            return Err(SpecFitError::InvalidParameter(format!(
                "area must be non-negative, got {}",
                self.area
            )));
        }
        Ok(())
    }
}

/// Quadrature settings for the convolution integral.
///
/// `n_conv` must be even and at least 2, since the quadrature pairs
/// samples symmetrically from both ends of the window; `n_sigma` sets the
/// half-width of the integration window in units of `gsigma`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvolutionSettings {
    /// Number of quadrature steps across the window.
    pub n_conv: usize,
    /// Window half-width in units of the Gaussian sigma.
    pub n_sigma: f64,
}

impl Default for ConvolutionSettings {
    fn default() -> Self {
        Self {
            n_conv: 100,
            n_sigma: 5.0,
        }
    }
}

impl ConvolutionSettings {
    pub fn new(n_conv: usize, n_sigma: f64) -> Result<Self> {
        if n_conv < 2 || n_conv % 2 != 0 {
            return Err(SpecFitError::InvalidInput(format!(
                "n_conv must be even and >= 2, got {}",
                n_conv
            )));
        }
        if !(n_sigma > 0.0) {
            return Err(SpecFitError::InvalidInput(format!(
                "n_sigma must be positive, got {}",
                n_sigma
            )));
        }
        Ok(Self { n_conv, n_sigma })
    }
}

/// Evaluate the Landau-Gaussian convolution at `x`.
///
/// The integration window is `[x - n_sigma * gsigma, x + n_sigma * gsigma]`
/// split into `n_conv` equal steps. Each iteration takes two midpoint
/// samples, one advancing in from the lower window edge and one receding
/// from the upper edge by the same amount, so the long right tail of the
/// Landau stays sampled without doubling the step count.
pub fn evaluate(x: f64, pars: &ShapeParameters, settings: &ConvolutionSettings) -> f64 {
    // Shift the location parameter so mpv is the actual maximum.
    let mpc = pars.mpv - MP_SHIFT * pars.width;

    let xlow = x - settings.n_sigma * pars.gsigma;
    let xupp = x + settings.n_sigma * pars.gsigma;
    let step = (xupp - xlow) / settings.n_conv as f64;

    let mut sum = 0.0;
    for i in 1..=settings.n_conv / 2 {
        let inset = (i as f64 - 0.5) * step;

        let xx = xlow + inset;
        sum += landau(xx, mpc, pars.width) / pars.width * gauss(x, xx, pars.gsigma);

        let xx = xupp - inset;
        sum += landau(xx, mpc, pars.width) / pars.width * gauss(x, xx, pars.gsigma);
    }

    pars.area * step * sum / ((2.0 * PI).sqrt() * pars.gsigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_pars() -> ShapeParameters {
        ShapeParameters::new(2.0, 50.0, 5000.0, 4.0)
    }

    /// Plain single-pass midpoint rule over the same window; the
    /// mirrored-pair loop must visit exactly the same sample set.
    fn single_pass(x: f64, pars: &ShapeParameters, settings: &ConvolutionSettings) -> f64 {
        let mpc = pars.mpv - MP_SHIFT * pars.width;
        let xlow = x - settings.n_sigma * pars.gsigma;
        let xupp = x + settings.n_sigma * pars.gsigma;
        let step = (xupp - xlow) / settings.n_conv as f64;
        let mut sum = 0.0;
        for i in 1..=settings.n_conv {
            let xx = xlow + (i as f64 - 0.5) * step;
            sum += landau(xx, mpc, pars.width) / pars.width * gauss(x, xx, pars.gsigma);
        }
        pars.area * step * sum / ((2.0 * PI).sqrt() * pars.gsigma)
    }

    #[test]
    fn test_mirrored_pair_sampling_matches_midpoint_rule() {
        let pars = reference_pars();
        let settings = ConvolutionSettings::default();
        for x in [40.0, 48.0, 50.0, 55.0, 70.0] {
            let paired = evaluate(x, &pars, &settings);
            let plain = single_pass(x, &pars, &settings);
            assert_relative_eq!(paired, plain, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_quadrature_converges_with_n_conv() {
        let pars = reference_pars();
        let fine = evaluate(52.0, &pars, &ConvolutionSettings::new(2000, 5.0).unwrap());
        let errs: Vec<f64> = [50, 100, 400, 1000]
            .into_iter()
            .map(|n_conv| {
                let v = evaluate(52.0, &pars, &ConvolutionSettings::new(n_conv, 5.0).unwrap());
                (v - fine).abs()
            })
            .collect();
        assert!(errs[3] < errs[0]);
        assert!(errs[3] < 1e-6 * fine.abs());
    }

    #[test]
    fn test_area_scaling_is_linear() {
        let settings = ConvolutionSettings::default();
        let mut pars = reference_pars();
        let base = evaluate(51.0, &pars, &settings);
        pars.area *= 3.0;
        assert_relative_eq!(evaluate(51.0, &pars, &settings), 3.0 * base, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_is_near_mpv() {
        let pars = reference_pars();
        let settings = ConvolutionSettings::default();
        let at_mpv = evaluate(pars.mpv, &pars, &settings);
        assert!(at_mpv > evaluate(pars.mpv - 10.0, &pars, &settings));
        assert!(at_mpv > evaluate(pars.mpv + 10.0, &pars, &settings));
        // Heavy right tail: the distribution falls off slower above the
        // peak than below it.
        let below = evaluate(pars.mpv - 15.0, &pars, &settings);
        let above = evaluate(pars.mpv + 15.0, &pars, &settings);
        assert!(above > below);
    }

    #[test]
    fn test_settings_validation() {
        assert!(ConvolutionSettings::new(0, 5.0).is_err());
        assert!(ConvolutionSettings::new(101, 5.0).is_err());
        assert!(ConvolutionSettings::new(100, 0.0).is_err());
        assert!(ConvolutionSettings::new(100, 5.0).is_ok());
    }

    #[test]
    fn test_shape_parameter_slices() {
        let pars = ShapeParameters::from_slice(&[2.0, 50.0, 5000.0, 4.0]).unwrap();
        assert_eq!(pars, reference_pars());
        assert_eq!(pars.to_array(), [2.0, 50.0, 5000.0, 4.0]);
        assert!(ShapeParameters::from_slice(&[1.0, 2.0]).is_err());

        assert!(reference_pars().validate().is_ok());
        assert!(ShapeParameters::new(0.0, 1.0, 1.0, 1.0).validate().is_err());
        assert!(ShapeParameters::new(1.0, 1.0, -1.0, 1.0)
            .validate()
            .is_err());
        assert!(ShapeParameters::new(1.0, 1.0, 1.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_mpv_correction() {
        assert_relative_eq!(
            most_probable_value(10.0, 2.0),
            10.0 + MP_SHIFT * 2.0,
            epsilon = 1e-15
        );
    }
}
