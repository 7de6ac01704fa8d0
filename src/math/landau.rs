//! Landau density approximation.
//!
//! The Landau density models the energy-loss fluctuations of charged
//! particles traversing thin absorbers. It has no closed form; this module
//! implements the standard CERNLIB piecewise rational approximation
//! (DENLAN), accurate to a few units in the seventh significant digit over
//! the full support.

/// Landau density in the standardized variable `v = (x - x0) / xi`.
///
/// The returned value is the density of the standardized distribution, not
/// divided by the scale `xi`. The maximum sits at `v ≈ -0.22278`, slightly
/// below the location parameter.
pub fn landau_pdf(v: f64) -> f64 {
    const P1: [f64; 5] = [
        0.425_989_487_5,
        -0.124_976_255_0,
        0.039_842_437_00,
        -0.006_298_287_635,
        0.001_511_162_253,
    ];
    const Q1: [f64; 5] = [
        1.0,
        -0.338_826_062_9,
        0.095_943_933_23,
        -0.016_080_422_83,
        0.003_778_942_063,
    ];
    const P2: [f64; 5] = [
        0.178_854_160_9,
        0.117_395_740_3,
        0.014_888_505_18,
        -0.001_394_989_411,
        0.000_128_361_721_1,
    ];
    const Q2: [f64; 5] = [
        1.0,
        0.742_879_508_2,
        0.315_393_296_1,
        0.066_942_195_48,
        0.008_790_609_714,
    ];
    const P3: [f64; 5] = [
        0.178_854_450_3,
        0.093_591_616_62,
        0.006_325_387_654,
        0.000_066_116_673_19,
        -0.000_002_031_049_101,
    ];
    const Q3: [f64; 5] = [
        1.0,
        0.609_780_992_1,
        0.256_061_666_5,
        0.047_467_223_84,
        0.006_957_301_675,
    ];
    const P4: [f64; 5] = [
        0.987_405_440_7,
        118.672_327_3,
        849.279_436_0,
        -743.779_244_4,
        427.026_218_6,
    ];
    const Q4: [f64; 5] = [1.0, 106.861_596_1, 337.649_621_4, 2016.712_389, 1597.063_511];
    const P5: [f64; 5] = [
        1.003_675_074,
        167.570_243_4,
        4789.711_289,
        21_217.867_67,
        -22_324.949_10,
    ];
    const Q5: [f64; 5] = [1.0, 156.942_453_7, 3745.310_488, 9834.698_876, 66_924.283_57];
    const P6: [f64; 5] = [
        1.000_827_619,
        664.914_313_6,
        62_972.926_65,
        475_554.699_8,
        -5_743_609.109,
    ];
    const Q6: [f64; 5] = [
        1.0,
        651.410_109_8,
        56_974.733_33,
        165_917.472_5,
        -2_815_759.939,
    ];
    const A1: [f64; 3] = [0.041_666_666_67, -0.019_965_277_78, 0.027_095_389_66];
    const A2: [f64; 2] = [-1.845_568_670, -4.284_640_743];

    fn ratio(p: &[f64; 5], q: &[f64; 5], v: f64) -> f64 {
        (p[0] + (p[1] + (p[2] + (p[3] + p[4] * v) * v) * v) * v)
            / (q[0] + (q[1] + (q[2] + (q[3] + q[4] * v) * v) * v) * v)
    }

    if v < -5.5 {
        let u = (v + 1.0).exp();
        if u < 1e-10 {
            return 0.0;
        }
        let ue = (-1.0 / u).exp();
        let us = u.sqrt();
        0.398_942_280_3 * (ue / us) * (1.0 + (A1[0] + (A1[1] + A1[2] * u) * u) * u)
    } else if v < -1.0 {
        let u = (-v - 1.0).exp();
        (-u).exp() * u.sqrt() * ratio(&P1, &Q1, v)
    } else if v < 1.0 {
        ratio(&P2, &Q2, v)
    } else if v < 5.0 {
        ratio(&P3, &Q3, v)
    } else if v < 12.0 {
        let u = 1.0 / v;
        u * u * ratio(&P4, &Q4, u)
    } else if v < 50.0 {
        let u = 1.0 / v;
        u * u * ratio(&P5, &Q5, u)
    } else if v < 300.0 {
        let u = 1.0 / v;
        u * u * ratio(&P6, &Q6, u)
    } else {
        let u = 1.0 / (v - v * v.ln() / (v + 1.0));
        u * u * (1.0 + (A2[0] + A2[1] * u) * u)
    }
}

/// Landau density with location parameter `mpv` and scale `sigma`.
///
/// Returns the standardized density at `(x - mpv) / sigma`; divide by
/// `sigma` for a normalized probability density. `sigma <= 0` yields 0.
pub fn landau(x: f64, mpv: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    landau_pdf((x - mpv) / sigma)
}
