pub mod bar;
pub mod series;

// Re-export the core data types for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar::{Bar, RawBar};
pub use series::Series;
