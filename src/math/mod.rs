//! Special functions used by the shape models.
//!
//! The Landau density follows the CERNLIB rational approximation; the
//! error function uses the Numerical Recipes erfc approximation. Both are
//! plain `f64 -> f64` functions with no state.

pub mod landau;
pub mod special;

pub use landau::{landau, landau_pdf};
pub use special::{erf, erfc, gauss, sigma_from_fwhm, FWHM_PER_SIGMA};
