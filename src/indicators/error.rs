// =============================================================================
// Indicator Errors
// =============================================================================
//
// Typed failures of the indicator core.  These abort the analysis for the
// request that produced them; they are deterministic for a given input and are
// never retried.

use thiserror::Error;

/// Failure raised while building a series or computing indicators over it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// The series holds fewer bars than the computation needs.
    #[error("insufficient data: got {got} bars, need at least {required}")]
    InsufficientData { got: usize, required: usize },

    /// A rolling window of zero periods was requested.
    #[error("invalid window size {0}: must be at least 1")]
    InvalidWindow(usize),

    /// Bar dates are not strictly ascending at `index`.
    #[error("bars out of order or duplicated at index {index}")]
    UnorderedSeries { index: usize },

    /// A required field is NaN or infinite.
    #[error("undefined {field} value at index {index}")]
    UndefinedValue { field: &'static str, index: usize },
}
