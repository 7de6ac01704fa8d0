//! Benchmarks for the Landau-Gaussian convolution evaluator and the
//! peak/FWHM search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use specfit_rs::langau::{evaluate, ConvolutionSettings, ShapeParameters};
use specfit_rs::search::locate_peak;

fn bench_evaluate(c: &mut Criterion) {
    let pars = ShapeParameters::new(2.0, 50.0, 5000.0, 4.0);
    let default = ConvolutionSettings::default();
    let fine = ConvolutionSettings::new(1000, 5.0).unwrap();

    c.bench_function("langau_evaluate_nconv_100", |b| {
        b.iter(|| evaluate(black_box(52.0), &pars, &default))
    });
    c.bench_function("langau_evaluate_nconv_1000", |b| {
        b.iter(|| evaluate(black_box(52.0), &pars, &fine))
    });
}

fn bench_locate_peak(c: &mut Criterion) {
    let pars = ShapeParameters::new(2.0, 50.0, 5000.0, 4.0);
    let settings = ConvolutionSettings::default();

    c.bench_function("langau_locate_peak", |b| {
        b.iter(|| locate_peak(black_box(&pars), &settings))
    });
}

criterion_group!(benches, bench_evaluate, bench_locate_peak);
criterion_main!(benches);
