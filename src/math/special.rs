//! Gaussian and error-function helpers shared by the shape models.

use std::f64::consts::LN_2;

/// Ratio between the FWHM and the sigma of a Gaussian,
/// `2 * sqrt(2 * ln(2)) ≈ 2.3548`.
pub const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Non-normalized Gaussian density `exp(-(x - mean)^2 / (2 sigma^2))`.
///
/// `sigma <= 0` yields 0.
pub fn gauss(x: f64, mean: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    let arg = (x - mean) / sigma;
    (-0.5 * arg * arg).exp()
}

/// Convert a Gaussian FWHM to the corresponding sigma.
pub fn sigma_from_fwhm(fwhm: f64) -> f64 {
    fwhm / (2.0 * (2.0 * LN_2).sqrt())
}

/// Complementary error function, rational approximation with relative
/// error below 1.2e-7 everywhere (Numerical Recipes erfcc).
pub fn erfc(x: f64) -> f64 {
    const A: [f64; 9] = [
        1.000_023_68,
        0.374_091_96,
        0.096_784_18,
        -0.186_288_06,
        0.278_868_07,
        -1.135_203_98,
        1.488_515_87,
        -0.822_152_23,
        0.170_872_77,
    ];
    let z = x.abs();
    if z > 26.0 {
        return if x.is_sign_positive() { 0.0 } else { 2.0 };
    }
    let t = 1.0 / (1.0 + 0.5 * z);
    let mut poly = 0.0;
    for &a in A.iter().rev() {
        poly = poly * t + a;
    }
    let ans = t * (-z * z - 1.265_512_23 + t * poly).exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Error function.
pub fn erf(x: f64) -> f64 {
    1.0 - erfc(x)
}
