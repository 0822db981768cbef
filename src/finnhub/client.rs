// =============================================================================
// Finnhub REST Client: company news
// =============================================================================
//
// GET /api/v1/company-news?symbol=..&from=YYYY-MM-DD&to=YYYY-MM-DD&token=..
//
// SECURITY: the API token is only ever placed in the query string of outgoing
// requests; it is never logged.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One news article about a company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub headline: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawNews {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    /// UNIX seconds.
    #[serde(default)]
    datetime: Option<i64>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Parse a company-news response body, keeping at most `limit` articles in
/// provider order (newest first).
pub fn parse_news(body: &str, limit: usize) -> Result<Vec<NewsItem>> {
    let raw: Vec<RawNews> =
        serde_json::from_str(body).context("failed to parse company news response")?;

    Ok(raw
        .into_iter()
        .take(limit)
        .map(|n| NewsItem {
            headline: non_empty(n.headline),
            url: non_empty(n.url),
            summary: non_empty(n.summary),
            published_at: n
                .datetime
                .filter(|&ts| ts > 0)
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
        .collect())
}

/// Finnhub REST client.
#[derive(Clone)]
pub struct FinnhubClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl FinnhubClient {
    /// Create a client against `base_url` (e.g. `https://finnhub.io/api/v1`).
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Finnhub HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "FinnhubClient initialised");

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            client,
        })
    }

    /// Articles about `ticker` published between `from` and `to` (inclusive).
    #[instrument(skip(self), name = "finnhub::company_news")]
    pub async fn company_news(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
        limit: usize,
    ) -> Result<Vec<NewsItem>> {
        let url = format!("{}/company-news", self.base_url);
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", ticker),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("GET /company-news request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read company news response")?;

        if !status.is_success() {
            anyhow::bail!("Finnhub GET /company-news returned {status}");
        }

        let news = parse_news(&body, limit)?;
        debug!(ticker, count = news.len(), "company news fetched");
        Ok(news)
    }
}
