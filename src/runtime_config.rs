// =============================================================================
// Runtime Configuration: service settings with atomic save
// =============================================================================
//
// Every tunable of the stock-lens service lives here: listen address, request
// defaults, upstream endpoints and the indicator windows.
//
// The file is JSON.  Saving writes a sibling `.json.tmp` and renames it over
// the target.  Every field has a serde default, so a partial or older file
// still loads.
//
// Secrets (the Finnhub API key) come from the environment only and are never
// written back to disk.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorParams;
use crate::types::Language;

/// Inclusive bounds of the look-back slider.
pub const MIN_MONTHS: u32 = 1;
pub const MAX_MONTHS: u32 = 12;

// =============================================================================
// Serde defaults
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_months() -> u32 {
    6
}

fn default_summary_rows() -> usize {
    10
}

fn default_news_limit() -> usize {
    5
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_finnhub_base_url() -> String {
    "https://finnhub.io/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Server ---------------------------------------------------------------

    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Request defaults -------------------------------------------------------

    /// Look-back in months when the request does not specify one.
    #[serde(default = "default_months")]
    pub default_months: u32,

    #[serde(default)]
    pub default_language: Language,

    /// Bars fed into the summary table (one fewer row is shown).
    #[serde(default = "default_summary_rows")]
    pub summary_rows: usize,

    /// Maximum number of news articles in a report.
    #[serde(default = "default_news_limit")]
    pub news_limit: usize,

    // --- Upstreams --------------------------------------------------------------

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default = "default_finnhub_base_url")]
    pub finnhub_base_url: String,

    /// Timeout applied to every upstream HTTP request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Finnhub token.  News is disabled when absent.
    #[serde(skip)]
    pub finnhub_api_key: Option<String>,

    // --- Indicators ---------------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            default_months: default_months(),
            default_language: Language::default(),
            summary_rows: default_summary_rows(),
            news_limit: default_news_limit(),
            yahoo_base_url: default_yahoo_base_url(),
            finnhub_base_url: default_finnhub_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            finnhub_api_key: None,
            indicators: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Read `path`.  A missing or malformed file is an error; `main` decides
    /// whether to fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in config file {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            default_months = config.default_months,
            "config file loaded"
        );

        Ok(config)
    }

    /// Write to `path` atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("cannot encode config as JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("cannot write {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("cannot move config into place at {}", path.display()))?;

        info!(path = %path.display(), "config file written");
        Ok(())
    }

    /// Apply `STOCK_LENS_BIND_ADDR` and `FINNHUB_API_KEY` from `lookup`
    /// (normally `std::env::var`).  Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(addr) = non_blank("STOCK_LENS_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(key) = non_blank("FINNHUB_API_KEY") {
            self.finnhub_api_key = Some(key);
        }
    }

    /// Clamp the default look-back into the slider range.
    pub fn normalise(&mut self) {
        self.default_months = self.default_months.clamp(MIN_MONTHS, MAX_MONTHS);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.default_months, 6);
        assert_eq!(cfg.default_language, Language::Korean);
        assert_eq!(cfg.summary_rows, 10);
        assert_eq!(cfg.news_limit, 5);
        assert!(cfg.finnhub_api_key.is_none());
        assert_eq!(cfg.indicators, IndicatorParams::default());
    }

    #[test]
    fn empty_object_loads_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.default_months, 6);
        assert_eq!(cfg.yahoo_base_url, "https://query1.finance.yahoo.com");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let json = r#"{ "default_language": "en", "indicators": { "rsi_period": 21 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.default_language, Language::English);
        assert_eq!(cfg.indicators.rsi_period, 21);
        assert_eq!(cfg.indicators.short_ma, 10);
        assert_eq!(cfg.news_limit, 5);
    }

    #[test]
    fn api_key_is_never_serialised() {
        let mut cfg = RuntimeConfig::default();
        cfg.finnhub_api_key = Some("secret-token".into());
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn env_overrides() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env(|key| match key {
            "STOCK_LENS_BIND_ADDR" => Some("127.0.0.1:8080".into()),
            "FINNHUB_API_KEY" => Some("   ".into()),
            _ => None,
        });
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert!(cfg.finnhub_api_key.is_none());

        cfg.apply_env(|key| (key == "FINNHUB_API_KEY").then(|| "abc".to_string()));
        assert_eq!(cfg.finnhub_api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn normalise_clamps_months() {
        let mut cfg: RuntimeConfig = serde_json::from_str(r#"{ "default_months": 40 }"#).unwrap();
        cfg.normalise();
        assert_eq!(cfg.default_months, 12);

        cfg.default_months = 0;
        cfg.normalise();
        assert_eq!(cfg.default_months, 1);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("stock-lens-cfg-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stock_lens.json");

        let mut cfg = RuntimeConfig::default();
        cfg.summary_rows = 20;
        cfg.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.summary_rows, 20);
        assert!(!path.with_extension("json.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(RuntimeConfig::load("/definitely/not/here/stock_lens.json").is_err());
    }
}
