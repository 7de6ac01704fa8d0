//! Pure shape functions for the fit models.
//!
//! Each function maps `(x, parameter slice)` to a model value and carries
//! no state, so an external fitter can call it directly as its model
//! function. The expected slice layout is the parameter-name order of the
//! corresponding [`FitModelKind`](crate::models::FitModelKind); slice
//! lengths are the caller's contract and only checked in debug builds.

use crate::langau::{evaluate, ConvolutionSettings, ShapeParameters};
use crate::math::{erf, gauss, landau};

/// Gaussian peak: `[constant, mean, sigma]`.
pub fn gaussian(x: f64, pars: &[f64]) -> f64 {
    debug_assert_eq!(pars.len(), 3);
    pars[0] * gauss(x, pars[1], pars[2])
}

/// Landau peak: `[constant, mpv, sigma]`.
///
/// `mpv` is the location parameter; the actual maximum sits at
/// `most_probable_value(mpv, sigma)`.
pub fn landau_peak(x: f64, pars: &[f64]) -> f64 {
    debug_assert_eq!(pars.len(), 3);
    pars[0] * landau(x, pars[1], pars[2])
}

/// Sum of Landau peaks: `[c0, mpv0, sigma0, c1, mpv1, sigma1, ...]`.
pub fn n_landau(x: f64, pars: &[f64]) -> f64 {
    debug_assert_eq!(pars.len() % 3, 0);
    pars.chunks_exact(3).map(|p| landau_peak(x, p)).sum()
}

/// Crystal Ball: Gaussian core with a power-law low-side tail,
/// `[scale, alpha, n, mean, sigma, offset]`.
///
/// `inverted` mirrors the shape about x = 0, putting the tail on the high
/// side.
pub fn crystal_ball(x: f64, pars: &[f64], inverted: bool) -> f64 {
    debug_assert_eq!(pars.len(), 6);
    let (scale, alpha, n, sigma, offset) = (pars[0], pars[1], pars[2], pars[4], pars[5]);
    let sign = if inverted { -1.0 } else { 1.0 };
    let x = sign * x;
    let mean = sign * pars[3];

    let pull = (x - mean) / sigma;
    if pull > -alpha {
        scale * gauss(x, mean, sigma) + offset
    } else {
        let abs_alpha = alpha.abs();
        let a = (n / abs_alpha).powf(n) * (-0.5 * abs_alpha * abs_alpha).exp();
        let b = n / abs_alpha - abs_alpha;
        scale * a * (b - pull).powf(-n) + offset
    }
}

/// Crystal Ball with the tail on the low side (the common orientation).
pub fn crystal_ball_shape(x: f64, pars: &[f64]) -> f64 {
    crystal_ball(x, pars, false)
}

/// Error-function rise glued to a Landau tail,
/// `[landau_scale, mpv, sigma, erf_scale, xoff, width, offset, x0]`:
/// below the switch point `x0` an erf turn-on, above it a Landau.
pub fn erf_landau(x: f64, pars: &[f64]) -> f64 {
    debug_assert_eq!(pars.len(), 8);
    let (c0, mpv, sigma) = (pars[0], pars[1], pars[2]);
    let (c1, xoff, width, offset, x0) = (pars[3], pars[4], pars[5], pars[6], pars[7]);
    if x > x0 {
        offset + c0 * landau(x, mpv, sigma)
    } else {
        offset + c1 * (erf(width * (x - xoff)) + 1.0)
    }
}

/// Shifted exponential decay towards an asymptote,
/// `[asymptote, start_value, start_time, time_constant]`.
pub fn exponential(x: f64, pars: &[f64]) -> f64 {
    debug_assert_eq!(pars.len(), 4);
    pars[0] + pars[1] * (-(x - pars[2]) / pars[3]).exp()
}

/// Landau-Gaussian convolution `[width, mpv, area, gsigma]` at the
/// default quadrature settings.
pub fn langau(x: f64, pars: &[f64]) -> f64 {
    debug_assert_eq!(pars.len(), 4);
    let shape = ShapeParameters::new(pars[0], pars[1], pars[2], pars[3]);
    evaluate(x, &shape, &ConvolutionSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::langau::most_probable_value;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian() {
        assert_relative_eq!(gaussian(5.0, &[2.0, 5.0, 1.0]), 2.0);
        assert_relative_eq!(
            gaussian(6.0, &[2.0, 5.0, 1.0]),
            2.0 * (-0.5f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_landau_peak_maximum_is_shifted() {
        let pars = [1.0, 10.0, 2.0];
        let mode = most_probable_value(10.0, 2.0);
        assert!(landau_peak(mode, &pars) > landau_peak(10.0, &pars));
        assert!(landau_peak(mode, &pars) > landau_peak(mode - 0.5, &pars));
    }

    #[test]
    fn test_n_landau_superposition() {
        let pars = [1.0, 10.0, 2.0, 0.5, 20.0, 2.0];
        let x = 12.0;
        let expected = landau_peak(x, &pars[..3]) + landau_peak(x, &pars[3..]);
        assert_relative_eq!(n_landau(x, &pars), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_crystal_ball_core_and_tail() {
        let pars = [1.0, 1.0, 2.0, 0.0, 1.0, 0.0];
        // Core is the plain Gaussian.
        assert_relative_eq!(crystal_ball(0.0, &pars, false), 1.0, epsilon = 1e-12);
        // Tail at x = -2: a = 4 exp(-1/2), b = 1, value = a (1+2)^-2.
        let a = 4.0 * (-0.5f64).exp();
        assert_relative_eq!(
            crystal_ball(-2.0, &pars, false),
            a / 9.0,
            epsilon = 1e-12
        );
        // Continuity at the junction pull = -alpha.
        let below = crystal_ball(-1.0 - 1e-9, &pars, false);
        let above = crystal_ball(-1.0 + 1e-9, &pars, false);
        assert_relative_eq!(below, above, max_relative = 1e-6);
    }

    #[test]
    fn test_crystal_ball_inverted_mirrors() {
        let pars = [1.5, 1.0, 2.0, 1.0, 1.0, 0.1];
        let mirrored = [1.5, 1.0, 2.0, -1.0, 1.0, 0.1];
        for x in [-3.0, -1.0, 0.0, 1.0, 2.5] {
            assert_relative_eq!(
                crystal_ball(x, &pars, true),
                crystal_ball(-x, &mirrored, false),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_erf_landau_branches() {
        let pars = [10.0, 20.0, 2.0, 3.0, 5.0, 0.5, 1.0, 8.0];
        // Below x0: erf turn-on plus offset.
        let low = erf_landau(5.0, &pars);
        assert_relative_eq!(low, 1.0 + 3.0 * (erf(0.0) + 1.0), epsilon = 1e-9);
        // Above x0: Landau plus offset.
        let high = erf_landau(20.0, &pars);
        assert_relative_eq!(
            high,
            1.0 + 10.0 * crate::math::landau(20.0, 20.0, 2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_exponential() {
        let pars = [1.0, 4.0, 2.0, 3.0];
        assert_relative_eq!(exponential(2.0, &pars), 5.0, epsilon = 1e-12);
        assert_relative_eq!(
            exponential(5.0, &pars),
            1.0 + 4.0 * (-1.0f64).exp(),
            epsilon = 1e-12
        );
        // Decays towards the asymptote.
        assert_relative_eq!(exponential(100.0, &pars), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_langau_shape_matches_evaluator() {
        let pars = [2.0, 50.0, 5000.0, 4.0];
        let direct = evaluate(
            52.0,
            &ShapeParameters::from_slice(&pars).unwrap(),
            &ConvolutionSettings::default(),
        );
        assert_relative_eq!(langau(52.0, &pars), direct, epsilon = 1e-12);
    }
}
