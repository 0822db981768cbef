// =============================================================================
// Report Module
// =============================================================================
//
// Turns enriched indicator rows into the structures clients display:
// - Chart panels (price + bands, RSI, OBV)
// - Tail-N summary table with day-over-day changes
// - The assembled, localised analysis report

pub mod builder;
pub mod charts;
pub mod summary;

pub use builder::{build_report, AnalysisReport, ReportInput, ReportOptions};
