// =============================================================================
// Shared types used across the stock-lens service
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display language of report labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    SimplifiedChinese,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Self::Korean,
        Self::English,
        Self::SimplifiedChinese,
        Self::Japanese,
    ];

    /// Short code used in query strings and config files.
    pub fn code(self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
            Self::SimplifiedChinese => "zh",
            Self::Japanese => "ja",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Korean => write!(f, "한국어"),
            Self::English => write!(f, "English"),
            Self::SimplifiedChinese => write!(f, "简体中文"),
            Self::Japanese => write!(f, "日本語"),
        }
    }
}

/// Error returned when a language code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language code '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
