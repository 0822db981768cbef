pub mod client;

pub use client::{FinnhubClient, NewsItem};
