// =============================================================================
// Yahoo Finance REST Client: daily history & quote summary
// =============================================================================
//
// Two public endpoints are used:
//   GET /v8/finance/chart/{symbol}?interval=1d&range={n}mo   (OHLCV history)
//   GET /v10/finance/quoteSummary/{symbol}?modules=...        (name, price,
//                                                             fundamentals)
//
// Neither requires authentication.  Payload parsing lives in free functions so
// it can be tested on recorded fixtures without the network.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::market_data::RawBar;

/// Modules requested from the quote-summary endpoint.
const QUOTE_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData";

// -----------------------------------------------------------------------------
// Public data types
// -----------------------------------------------------------------------------

/// Company fundamentals.  Every field is optional: the provider omits whatever
/// does not apply to the instrument (ETFs carry no operating margin, etc.).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Trailing price / earnings.
    pub per: Option<f64>,
    /// Trailing earnings per share.
    pub eps: Option<f64>,
    /// Price / book.
    pub pb: Option<f64>,
    pub op_margin: Option<f64>,
    pub total_revenue: Option<f64>,
    pub total_assets: Option<f64>,
}

/// Identity and latest price of an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub short_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub fundamentals: Fundamentals,
}

impl Quote {
    /// A quote without a company name means the symbol is not listed.
    pub fn is_listed(&self) -> bool {
        self.short_name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

// -----------------------------------------------------------------------------
// Chart payload
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Parse a chart response body into raw daily bars, oldest first.
///
/// Each timestamp is shifted by the exchange `gmtoffset` before taking the
/// calendar date, so a session opening at 09:30 New York time maps to that
/// New York date.  Columns shorter than the timestamp vector yield missing
/// fields, never an error.
///
/// During a session Yahoo appends a live-price row that lands on the same
/// exchange date as the last daily bar; rows sharing a date are merged so
/// every date appears once.
pub fn parse_chart(body: &str) -> Result<Vec<RawBar>> {
    let response: ChartResponse =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = response.chart.error {
        anyhow::bail!("Yahoo chart error: {} - {}", err.code, err.description);
    }

    let data = response
        .chart
        .result
        .context("chart response has no result")?
        .into_iter()
        .next()
        .context("chart result array is empty")?;

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = data.meta.gmtoffset;

    let mut bars = Vec::with_capacity(data.timestamp.len());
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let date = match session_date(ts, offset) {
            Some(d) => d,
            None => {
                warn!(timestamp = ts, "skipping bar with out-of-range timestamp");
                continue;
            }
        };
        bars.push(RawBar {
            date,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close: quote.close.get(i).copied().flatten(),
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    Ok(merge_same_day(bars))
}

/// Collapse consecutive rows with the same date.  The later row wins unless
/// it is incomplete and the earlier one is not.
fn merge_same_day(bars: Vec<RawBar>) -> Vec<RawBar> {
    let mut merged: Vec<RawBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match merged.last_mut() {
            Some(prev) if prev.date == bar.date => {
                if bar.complete().is_some() || prev.complete().is_none() {
                    debug!(date = %bar.date, "merging same-day chart rows");
                    *prev = bar;
                }
            }
            _ => merged.push(bar),
        }
    }
    merged
}

fn session_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp.checked_add(gmtoffset)?, 0).map(|dt| dt.date_naive())
}

// -----------------------------------------------------------------------------
// Quote-summary payload
// -----------------------------------------------------------------------------

/// Yahoo wraps numbers as `{ "raw": 12.3, "fmt": "12.30" }`; bare numbers are
/// accepted too.  Empty objects (`{}`) mean "not available".
fn raw_number(module: &serde_json::Value, field: &str) -> Option<f64> {
    let val = module.get(field)?;
    val.get("raw")
        .and_then(serde_json::Value::as_f64)
        .or_else(|| val.as_f64())
        .filter(|v| v.is_finite())
}

/// Parse a quote-summary response body for `symbol`.
///
/// A `Not Found` error object yields an unlisted quote rather than an error,
/// so callers can fall back to a company-name lookup.
pub fn parse_quote_summary(symbol: &str, body: &str) -> Result<Quote> {
    let root: serde_json::Value =
        serde_json::from_str(body).context("failed to parse quote summary JSON")?;

    let summary = &root["quoteSummary"];
    if let Some(err) = summary.get("error").filter(|e| !e.is_null()) {
        if err["code"].as_str() == Some("Not Found") {
            return Ok(Quote {
                symbol: symbol.to_string(),
                short_name: None,
                regular_market_price: None,
                fundamentals: Fundamentals::default(),
            });
        }
        anyhow::bail!(
            "Yahoo quote summary error: {} - {}",
            err["code"].as_str().unwrap_or("unknown"),
            err["description"].as_str().unwrap_or("")
        );
    }

    let result = summary["result"]
        .as_array()
        .and_then(|r| r.first())
        .context("quote summary has no result")?;

    let price = &result["price"];
    let detail = &result["summaryDetail"];
    let stats = &result["defaultKeyStatistics"];
    let financial = &result["financialData"];

    let short_name = price["shortName"]
        .as_str()
        .or_else(|| price["longName"].as_str())
        .map(str::to_string);

    let fundamentals = Fundamentals {
        per: raw_number(detail, "trailingPE"),
        eps: raw_number(stats, "trailingEps"),
        pb: raw_number(stats, "priceToBook"),
        op_margin: raw_number(financial, "operatingMargins"),
        total_revenue: raw_number(financial, "totalRevenue"),
        total_assets: raw_number(stats, "totalAssets"),
    };

    Ok(Quote {
        symbol: price["symbol"].as_str().unwrap_or(symbol).to_string(),
        short_name,
        regular_market_price: raw_number(price, "regularMarketPrice"),
        fundamentals,
    })
}

// -----------------------------------------------------------------------------
// Client
// -----------------------------------------------------------------------------

/// Characters Yahoo uses in symbols (`BRK-B`, `^GSPC`, `EURUSD=X`, `005930.KS`).
/// Anything else cannot name a listed instrument.
pub fn is_symbol(ticker: &str) -> bool {
    let mut chars = ticker.chars();
    let leads_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '^');
    leads_ok
        && ticker.len() <= 20
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '^' | '=' | '-'))
}

/// `{base}/{segments..}/{ticker}` with the ticker as a single encoded path
/// segment, followed by `query`.
fn endpoint_url(base_url: &str, segments: &[&str], ticker: &str, query: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(base_url).with_context(|| format!("invalid Yahoo base URL {base_url}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Yahoo base URL {base_url} cannot carry a path"))?
        .pop_if_empty()
        .extend(segments)
        .push(ticker);
    url.query_pairs_mut().extend_pairs(query);
    Ok(url)
}

/// Chart endpoint for `months` of daily bars.
pub fn chart_url(base_url: &str, ticker: &str, months: u32) -> Result<Url> {
    let range = format!("{months}mo");
    endpoint_url(
        base_url,
        &["v8", "finance", "chart"],
        ticker,
        &[("interval", "1d"), ("range", range.as_str())],
    )
}

/// Quote-summary endpoint with every module the report reads.
pub fn quote_summary_url(base_url: &str, ticker: &str) -> Result<Url> {
    endpoint_url(
        base_url,
        &["v10", "finance", "quoteSummary"],
        ticker,
        &[("modules", QUOTE_MODULES)],
    )
}

/// Yahoo Finance REST client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client against `base_url` (e.g. `https://query1.finance.yahoo.com`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(timeout)
            .build()
            .context("failed to build Yahoo HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    async fn get_text(&self, url: Url, what: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {what} request failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read {what} response"))?;

        if !status.is_success() && !status.is_client_error() {
            anyhow::bail!("Yahoo GET {what} returned {status}");
        }
        // 4xx bodies still carry the structured `error` object, which the
        // parsers turn into a readable message.
        Ok(body)
    }

    /// Daily bars for the trailing `months` calendar months.
    #[instrument(skip(self), name = "yahoo::fetch_history")]
    pub async fn fetch_history(&self, ticker: &str, months: u32) -> Result<Vec<RawBar>> {
        let url = chart_url(&self.base_url, ticker, months)?;
        let body = self.get_text(url, "/v8/finance/chart").await?;
        let bars = parse_chart(&body)?;

        debug!(ticker, months, count = bars.len(), "history fetched");
        Ok(bars)
    }

    /// Name, latest price and fundamentals for `ticker`.
    #[instrument(skip(self), name = "yahoo::fetch_quote")]
    pub async fn fetch_quote(&self, ticker: &str) -> Result<Quote> {
        let url = quote_summary_url(&self.base_url, ticker)?;
        let body = self.get_text(url, "/v10/finance/quoteSummary").await?;
        let quote = parse_quote_summary(ticker, &body)?;

        debug!(ticker, listed = quote.is_listed(), "quote fetched");
        Ok(quote)
    }
}
