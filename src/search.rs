//! Peak and half-maximum search for the Landau-Gaussian convolution.
//!
//! Given fitted shape parameters, [`locate_peak`] finds the x of the
//! convolution maximum and the half-maximum crossings on either side of
//! it, using three runs of the same adaptive hill-climbing scheme. The
//! search is a heuristic local optimizer carried over from the original
//! procedure ("probably not very efficient"); it has no global convergence
//! guarantee and non-convergence is reported through a status field, not
//! an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::langau::{evaluate, ConvolutionSettings, ShapeParameters};

/// Default iteration budget per search stage.
pub const DEFAULT_MAX_ITER: usize = 10_000;

/// Whether the adaptive search climbs towards larger or smaller objective
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSense {
    Maximize,
    Minimize,
}

/// Outcome of a single adaptive 1-D search.
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    /// Last probed position.
    pub position: f64,
    /// Objective value at `position`.
    pub value: f64,
    /// Iterations consumed.
    pub iterations: usize,
    /// Whether the probed objective stopped changing within the budget.
    pub converged: bool,
}

/// Adaptive 1-D local search.
///
/// Probes the objective at `p + step`; when the probe comes out worse than
/// the previous one the step is reversed and shrunk by a factor of 10,
/// otherwise the position advances by `step`. Terminates when the probed
/// objective stops changing between consecutive iterations, or when the
/// iteration budget runs out.
///
/// The objective is assumed locally unimodal around the sought point; on
/// multi-modal objectives the search may settle on the wrong extremum.
pub fn adaptive_search<F>(
    objective: F,
    start: f64,
    initial_step: f64,
    sense: SearchSense,
    max_iter: usize,
) -> SearchOutcome
where
    F: Fn(f64) -> f64,
{
    let mut p = start;
    let mut step = initial_step;
    let mut lold = -2.0;
    // Seed below any reachable objective value so the first probe never
    // reads as a degradation when maximizing.
    let mut l = match sense {
        SearchSense::Maximize => -1.0,
        SearchSense::Minimize => -1e300,
    };
    let mut x = start;
    let mut i = 0;

    while l != lold && i < max_iter {
        i += 1;
        lold = l;
        x = p + step;
        l = objective(x);

        let worse = match sense {
            SearchSense::Maximize => l < lold,
            SearchSense::Minimize => l > lold,
        };
        if worse {
            step = -step / 10.0;
        }
        p += step;
    }

    SearchOutcome {
        position: x,
        value: l,
        iterations: i,
        converged: i < max_iter,
    }
}

/// Termination status of [`locate_peak`], one variant per search stage
/// that can exhaust its iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// All three stages converged.
    Ok,
    /// The mode search ran out of iterations.
    MaxIterMode,
    /// The right half-maximum search ran out of iterations.
    MaxIterRight,
    /// The left half-maximum search ran out of iterations.
    MaxIterLeft,
}

/// Peak position and full width at half maximum of a Landau-Gaussian
/// convolution.
///
/// When `status` is not [`SearchStatus::Ok`], the fields belonging to the
/// failed stage and every later stage hold NaN and must not be used; a
/// partial FWHM is never reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakSearchResult {
    /// Position of the convolution maximum.
    pub mode: f64,
    /// Half-maximum crossing below the mode.
    pub half_max_left: f64,
    /// Half-maximum crossing above the mode.
    pub half_max_right: f64,
    /// `half_max_right - half_max_left`.
    pub fwhm: f64,
    pub status: SearchStatus,
}

impl PeakSearchResult {
    pub fn converged(&self) -> bool {
        self.status == SearchStatus::Ok
    }

    fn failed(status: SearchStatus, mode: f64) -> Self {
        Self {
            mode,
            half_max_left: f64::NAN,
            half_max_right: f64::NAN,
            fwhm: f64::NAN,
            status,
        }
    }
}

/// Locate the maximum of the convolution and its half-maximum crossings
/// with the default iteration budget.
pub fn locate_peak(pars: &ShapeParameters, settings: &ConvolutionSettings) -> PeakSearchResult {
    locate_peak_with_budget(pars, settings, DEFAULT_MAX_ITER)
}

/// Locate the maximum of the convolution and its half-maximum crossings.
///
/// Three sequential stages: the mode search maximizes the convolution
/// itself starting just below `mpv`; the right and left crossing searches
/// minimize the distance to half the peak value starting one Landau width
/// above, respectively half a width below, the mode. Each stage gets its
/// own `max_iter` budget.
pub fn locate_peak_with_budget(
    pars: &ShapeParameters,
    settings: &ConvolutionSettings,
    max_iter: usize,
) -> PeakSearchResult {
    let f = |p: f64| evaluate(p, pars, settings);

    let mode = adaptive_search(
        f,
        pars.mpv - 0.1 * pars.width,
        0.05 * pars.width,
        SearchSense::Maximize,
        max_iter,
    );
    if !mode.converged {
        warn!(max_iter, "peak search: mode stage exhausted its budget");
        return PeakSearchResult::failed(SearchStatus::MaxIterMode, f64::NAN);
    }

    let fy = mode.value / 2.0;
    let distance = |p: f64| (evaluate(p, pars, settings) - fy).abs();

    let right = adaptive_search(
        &distance,
        mode.position + pars.width,
        pars.width,
        SearchSense::Minimize,
        max_iter,
    );
    if !right.converged {
        warn!(max_iter, "peak search: right crossing exhausted its budget");
        return PeakSearchResult::failed(SearchStatus::MaxIterRight, mode.position);
    }

    let left = adaptive_search(
        &distance,
        mode.position - 0.5 * pars.width,
        -pars.width,
        SearchSense::Minimize,
        max_iter,
    );
    if !left.converged {
        warn!(max_iter, "peak search: left crossing exhausted its budget");
        return PeakSearchResult::failed(SearchStatus::MaxIterLeft, mode.position);
    }

    PeakSearchResult {
        mode: mode.position,
        half_max_left: left.position,
        half_max_right: right.position,
        fwhm: right.position - left.position,
        status: SearchStatus::Ok,
    }
}
