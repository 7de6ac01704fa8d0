//! # specfit-rs
//!
//! `specfit-rs` provides histogram binning and peak-shape analysis
//! utilities for particle-physics pulse and charge spectra.
//!
//! The library provides:
//! - The Landau-Gaussian convolution ("langau") evaluator and a companion
//!   peak/FWHM search for resolution-smeared energy-loss spectra
//! - A family of peak-shape models (Gaussian, Landau, Crystal Ball,
//!   error-function/Landau hybrid, exponential, multi-Landau sums)
//!   dispatched as tagged configurations with per-model start-value and
//!   limit strategies
//! - Data-driven binning estimation (Freedman-Diaconis widths,
//!   quantile-trimmed ranges) and a lightweight 1-D histogram
//! - A parameter system with names, bounds, and varying flags, and a
//!   [`fit::CurveFitter`] seam for an external nonlinear least-squares
//!   minimizer
//!
//! ## Basic Usage
//!
//! ```
//! use specfit_rs::langau::{ConvolutionSettings, ShapeParameters};
//! use specfit_rs::search::locate_peak;
//!
//! let pars = ShapeParameters::new(2.0, 50.0, 5000.0, 4.0);
//! let peak = locate_peak(&pars, &ConvolutionSettings::default());
//! assert!(peak.converged());
//! assert!(peak.half_max_left < peak.mode && peak.mode < peak.half_max_right);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Numerics
pub mod binning;
pub mod histogram;
pub mod langau;
pub mod math;
pub mod search;

// Model registry and fit seam
pub mod fit;
pub mod models;

// Re-exports for convenience
pub use error::{Result, SpecFitError};

pub use binning::BinSpec;
pub use fit::{CurveFitter, FitConfig, FitOutcome, FitProblem, MinimizerKind};
pub use histogram::Hist1D;
pub use langau::{evaluate, ConvolutionSettings, ShapeParameters};
pub use models::FitModelKind;
pub use search::{locate_peak, PeakSearchResult, SearchStatus};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
