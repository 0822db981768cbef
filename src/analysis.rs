// =============================================================================
// Analysis Service
// =============================================================================
//
// Orchestrates one analysis request:
//   1. Resolve the query to a listed ticker (symbol first, then company name).
//   2. Fetch daily history and build a validated series.
//   3. Run the indicator pipeline.
//   4. Fetch news when requested and configured (best effort).
//   5. Assemble the report.
//
// Indicator failures abort the request with a typed error; they are
// deterministic for the same input so nothing is retried.
// =============================================================================

use chrono::{Months, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::app_state::AppState;
use crate::i18n::labels;
use crate::indicators::{IndicatorError, RsiZone};
use crate::market_data::Series;
use crate::report::{build_report, AnalysisReport, ReportInput, ReportOptions};
use crate::ticker_lookup::resolve_ticker;
use crate::yahoo::{is_symbol, Quote};

/// Failure of a whole analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no listed ticker matches '{0}'")]
    TickerNotFound(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("upstream data provider failed: {0:#}")]
    Upstream(anyhow::Error),
}

/// Look up `query` as a symbol; fall back to the company-name table.
///
/// Queries that cannot be a symbol skip the provider and go straight to the
/// table; if that has no match either the request is invalid.
#[instrument(skip(state), name = "analysis::resolve")]
async fn resolve_quote(state: &AppState, query: &str) -> Result<(String, Quote), AnalysisError> {
    let ticker = query.trim().to_uppercase();
    let symbol_like = is_symbol(&ticker);

    let first_failure = if !symbol_like {
        debug!(query = %query, "not a ticker symbol, trying company-name lookup");
        None
    } else {
        match state.yahoo.fetch_quote(&ticker).await {
            Ok(quote) if quote.is_listed() => return Ok((ticker, quote)),
            Ok(_) => {
                info!(ticker = %ticker, "symbol not listed, trying company-name lookup");
                None
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "quote lookup failed, trying company-name lookup");
                Some(e)
            }
        }
    };

    let Some(resolved) = resolve_ticker(query).filter(|t| *t != ticker) else {
        return Err(match first_failure {
            Some(e) => AnalysisError::Upstream(e),
            None if !symbol_like => AnalysisError::InvalidRequest(format!(
                "'{}' is neither a ticker symbol nor a known company name",
                query.trim()
            )),
            None => AnalysisError::TickerNotFound(query.trim().to_string()),
        });
    };

    let quote = state
        .yahoo
        .fetch_quote(resolved)
        .await
        .map_err(AnalysisError::Upstream)?;
    info!(query = %query, ticker = resolved, "resolved company name to ticker");
    Ok((resolved.to_string(), quote))
}

/// Run a full analysis for `query`.
#[instrument(skip(state, options), fields(months = options.months, lang = %options.language))]
pub async fn run_analysis(
    state: &AppState,
    query: &str,
    options: &ReportOptions,
) -> Result<AnalysisReport, AnalysisError> {
    if query.trim().is_empty() {
        let prompt = labels(options.language).enter_ticker;
        return Err(AnalysisError::InvalidRequest(prompt.to_string()));
    }
    let (ticker, quote) = resolve_quote(state, query).await?;

    let raw = state
        .yahoo
        .fetch_history(&ticker, options.months)
        .await
        .map_err(AnalysisError::Upstream)?;
    let series = Series::from_raw(&raw)?;
    debug!(ticker = %ticker, fetched = raw.len(), usable = series.len(), "history loaded");
    let pipeline = state.pipeline();
    let rows = pipeline.run(&series)?;

    let (summary_rows, news_limit) = {
        let cfg = state.runtime_config.read();
        (cfg.summary_rows, cfg.news_limit)
    };

    let news = match (&state.finnhub, options.news) {
        (Some(client), true) => {
            let to = Utc::now().date_naive();
            let from = to.checked_sub_months(Months::new(options.months)).unwrap_or(to);
            match client.company_news(&ticker, from, to, news_limit).await {
                Ok(items) => Some(items),
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "news fetch failed, omitting news section");
                    None
                }
            }
        }
        _ => None,
    };

    let rsi_zone = rows
        .last()
        .and_then(|r| r.rsi14)
        .map(RsiZone::classify)
        .map_or_else(|| "n/a".to_string(), |zone| zone.to_string());
    info!(ticker = %ticker, bars = rows.len(), rsi_zone = %rsi_zone, "analysis complete");

    Ok(build_report(ReportInput {
        ticker: &ticker,
        quote: &quote,
        rows,
        news,
        options,
        params: pipeline.params(),
        summary_rows,
    }))
}
