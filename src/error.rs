use thiserror::Error;

/// Error types for the specfit-rs library.
#[derive(Error, Debug)]
pub enum SpecFitError {
    /// Error for invalid shape or model parameter values.
    #[error("Invalid parameter value: {0}")]
    InvalidParameter(String),

    /// Error indicating a mismatch in slice or array lengths.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parameter not found in a parameter collection.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// Error for boundary constraint violations.
    #[error("Bounds error: {0}")]
    BoundsError(String),

    /// Error during computational operations.
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// Error reported by an external fitter implementation.
    #[error("Fit failed: {0}")]
    FitFailure(String),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for specfit-rs operations.
pub type Result<T> = std::result::Result<T, SpecFitError>;

/// Extensions for converting from other error types.
impl From<String> for SpecFitError {
    fn from(s: String) -> Self {
        SpecFitError::Other(s)
    }
}

impl From<&str> for SpecFitError {
    fn from(s: &str) -> Self {
        SpecFitError::Other(s.to_string())
    }
}
