pub mod client;

pub use client::{is_symbol, Fundamentals, Quote, YahooClient};
