//! # Parameter System
//!
//! Named fit parameters with values, bounds, and varying flags, plus an
//! ordered collection that converts to and from the flat parameter slices
//! an external minimizer works with.
//!
//! ## Example Usage
//!
//! ```rust
//! use specfit_rs::parameters::Parameters;
//!
//! let mut params = Parameters::new();
//! params.add_param("mpv", 50.0).unwrap();
//! params
//!     .add_param_with_bounds("width", 1.0, 0.0, 10.0)
//!     .unwrap();
//!
//! // Fix a parameter (won't be varied during optimization)
//! params.get_mut("width").unwrap().set_vary(false);
//!
//! let mpv = params.get("mpv").unwrap().value();
//! assert_eq!(mpv, 50.0);
//!
//! // Convert to a flat array for the fitter, and back
//! let values = params.to_array();
//! params.update_from_slice(values.as_slice().unwrap()).unwrap();
//! ```

pub mod parameter;
pub mod parameters;

// Re-export key types
pub use parameter::Parameter;
pub use parameters::Parameters;
