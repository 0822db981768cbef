// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler via `Arc<AppState>`.  Holds configuration,
// the upstream clients and a few counters for the health endpoint.  No market
// data is cached: every analysis fetches and computes afresh.
//
// Thread safety:
//   - Atomic counters for lock-free request accounting.
//   - parking_lot::RwLock for configuration and the recent-error log.
//   - reqwest clients are internally reference-counted and cheap to clone.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::finnhub::FinnhubClient;
use crate::indicators::IndicatorPipeline;
use crate::runtime_config::RuntimeConfig;
use crate::yahoo::YahooClient;

// =============================================================================
// Error Record
// =============================================================================

/// A recorded failure for the health endpoint's error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// Ticker or query the failing request was about.
    pub subject: Option<String>,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

// =============================================================================
// AppState
// =============================================================================

pub struct AppState {
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub yahoo: YahooClient,
    /// `None` when no Finnhub API key is configured.
    pub finnhub: Option<FinnhubClient>,

    pub analyses_served: AtomicU64,
    pub analyses_failed: AtomicU64,
    pub recent_errors: RwLock<VecDeque<ErrorRecord>>,
}

impl AppState {
    /// Build the state and its HTTP clients from `config`.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let yahoo = YahooClient::new(config.yahoo_base_url.clone(), timeout)?;
        let finnhub = match &config.finnhub_api_key {
            Some(key) => Some(FinnhubClient::new(
                key.clone(),
                config.finnhub_base_url.clone(),
                timeout,
            )?),
            None => None,
        };

        Ok(Self {
            runtime_config: Arc::new(RwLock::new(config)),
            yahoo,
            finnhub,
            analyses_served: AtomicU64::new(0),
            analyses_failed: AtomicU64::new(0),
            recent_errors: RwLock::new(VecDeque::with_capacity(MAX_RECENT_ERRORS)),
        })
    }

    /// Pipeline configured with the current indicator windows.
    pub fn pipeline(&self) -> IndicatorPipeline {
        IndicatorPipeline::new(self.runtime_config.read().indicators.clone())
    }

    pub fn record_success(&self) {
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed analysis and keep its message in the bounded error log.
    pub fn record_error(&self, message: impl Into<String>, subject: Option<&str>) {
        self.analyses_failed.fetch_add(1, Ordering::Relaxed);

        let mut errors = self.recent_errors.write();
        if errors.len() >= MAX_RECENT_ERRORS {
            errors.pop_front();
        }
        errors.push_back(ErrorRecord {
            message: message.into(),
            subject: subject.map(str::to_string),
            at: Utc::now().to_rfc3339(),
        });
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.recent_errors.read().iter().cloned().collect()
    }
}
