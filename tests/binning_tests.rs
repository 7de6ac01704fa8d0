//! Integration tests for binning estimation on synthetic spectra.

use approx::assert_relative_eq;
use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use specfit_rs::binning::{find, find_range, freedman_diaconis, width, BinSpec, FindOptions};
use specfit_rs::histogram::Hist1D;

fn normal_sample(n: usize, mean: f64, sigma: f64, seed: u64) -> Array1<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Normal::new(mean, sigma).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

#[test]
fn freedman_diaconis_matches_normal_expectation() {
    // For a normal sample the IQR is about 1.349 sigma, so the FD width
    // is about 2 * 1.349 * sigma / n^(1/3).
    let values = normal_sample(5000, 50.0, 10.0, 7);
    let expected = 2.0 * 1.349 * 10.0 / 5000f64.cbrt();
    let w = freedman_diaconis(&values);
    assert!(
        (w - expected).abs() < 0.15 * expected,
        "w = {}, expected about {}",
        w,
        expected
    );
    assert_relative_eq!(width(&values), w, epsilon = 1e-12);
}

#[test]
fn find_covers_the_bulk_of_the_sample() {
    let values = normal_sample(2000, 50.0, 10.0, 11);
    let spec = find(&values, &FindOptions::default()).unwrap();
    assert!(spec.validate().is_ok());

    let hist = Hist1D::from_samples(&spec, &values).unwrap();
    // The 2% quantile trim plus 20% expansion keeps nearly everything.
    assert!(hist.entries() as f64 >= 0.95 * values.len() as f64);
    assert!((hist.mean() - 50.0).abs() < 1.0);
}

#[test]
fn find_range_is_robust_against_outliers() {
    let mut values: Vec<f64> = normal_sample(1000, 0.0, 1.0, 3).to_vec();
    values.push(1e6);
    values.push(-1e6);
    let values = Array1::from_vec(values);
    let [lo, hi] = find_range(&values, 0.2, 0.2, 0.02, None);
    assert!(lo > -10.0 && hi < 10.0, "range [{}, {}]", lo, hi);
}

#[test]
fn bin_spec_round_trip_through_histogram() {
    let values = normal_sample(500, 20.0, 3.0, 5);
    let spec = find(&values, &FindOptions::default()).unwrap();
    assert_eq!(spec.n_bins, spec.edges.len() - 1);

    let hist = Hist1D::from_samples(&spec, &values).unwrap();
    assert_eq!(hist.n_bins(), spec.n_bins);
    assert_eq!(hist.edges(), spec.edges.as_slice());
    // Every content index maps back onto an edge pair.
    for i in 0..hist.n_bins() {
        assert!(hist.bin_width(i) > 0.0);
    }
}

#[test]
fn bin_spec_serializes() {
    let spec = BinSpec::with_count(0.0, 10.0, 4).unwrap();
    let json = serde_json::to_string(&spec).unwrap();
    let back: BinSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);
    assert!(back.validate().is_ok());
}

#[test]
fn constant_sample_end_to_end() {
    let values = Array1::from_elem(100, 5.0);
    let spec = find(&values, &FindOptions::default()).unwrap();
    assert_eq!(spec.n_bins, 3);
    assert_relative_eq!(spec.edges[0], 4.25, epsilon = 1e-12);
    assert_relative_eq!(spec.edges[3], 5.75, epsilon = 1e-12);

    // The synthetic bins still take the constant data.
    let hist = Hist1D::from_samples(&spec, &values).unwrap();
    assert_eq!(hist.entries(), 100);
    // 5.0 lands in the central bin [4.75, 5.25).
    assert_eq!(hist.maximum_bin(), 1);
}
