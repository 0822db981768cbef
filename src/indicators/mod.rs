// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators rendered by the
// analysis report.  Every series function returns one value per input bar;
// values that cannot be defined are `None` rather than NaN.

pub mod bollinger;
pub mod error;
pub mod moving_average;
pub mod obv;
pub mod pipeline;
pub mod rsi;

pub use bollinger::bollinger_bands;
pub use error::IndicatorError;
pub use moving_average::{moving_average, rolling_std};
pub use obv::calculate_obv;
pub use pipeline::{IndicatorParams, IndicatorPipeline, IndicatorRow};
pub use rsi::{calculate_rsi, RsiZone};
