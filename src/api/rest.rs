// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are read-only:
//   GET /api/v1/health                      service status and error log
//   GET /api/v1/tickers/resolve?q=tesla     company name -> ticker
//   GET /api/v1/analysis/{query}?months=6&lang=en&chart=true&table=true
//                                &finance=false&news=true
//
// CORS is permissive so a browser front-end on another origin can render the
// chart panels directly.
// =============================================================================

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::analysis::{run_analysis, AnalysisError};
use crate::app_state::{AppState, ErrorRecord};
use crate::report::ReportOptions;
use crate::runtime_config::{RuntimeConfig, MAX_MONTHS, MIN_MONTHS};
use crate::ticker_lookup::{company_name, resolve_ticker};
use crate::types::Language;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/tickers/resolve", get(resolve))
        .route("/api/v1/analysis/:query", get(analysis))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Error responses
// =============================================================================

impl AnalysisError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::TickerNotFound(_) => StatusCode::NOT_FOUND,
            Self::Indicator(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    analyses_served: u64,
    analyses_failed: u64,
    news_enabled: bool,
    recent_errors: Vec<ErrorRecord>,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        analyses_served: state.analyses_served.load(Ordering::Relaxed),
        analyses_failed: state.analyses_failed.load(Ordering::Relaxed),
        news_enabled: state.finnhub.is_some(),
        recent_errors: state.recent_errors(),
    };
    Json(resp)
}

// =============================================================================
// Ticker resolution
// =============================================================================

#[derive(Deserialize)]
struct ResolveParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct ResolveResponse {
    query: String,
    ticker: &'static str,
    company_name: Option<&'static str>,
}

async fn resolve(Query(params): Query<ResolveParams>) -> Result<Json<ResolveResponse>, AnalysisError> {
    let ticker = resolve_ticker(&params.q)
        .ok_or_else(|| AnalysisError::TickerNotFound(params.q.trim().to_string()))?;
    Ok(Json(ResolveResponse {
        company_name: company_name(ticker),
        query: params.q,
        ticker,
    }))
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct AnalysisParams {
    #[serde(default)]
    months: Option<u32>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    chart: Option<bool>,
    #[serde(default)]
    table: Option<bool>,
    #[serde(default)]
    finance: Option<bool>,
    #[serde(default)]
    news: Option<bool>,
}

/// Validate query parameters and fill the gaps from configuration.
fn report_options(params: &AnalysisParams, cfg: &RuntimeConfig) -> Result<ReportOptions, AnalysisError> {
    let months = params.months.unwrap_or(cfg.default_months);
    if !(MIN_MONTHS..=MAX_MONTHS).contains(&months) {
        return Err(AnalysisError::InvalidRequest(format!(
            "months must be between {MIN_MONTHS} and {MAX_MONTHS}, got {months}"
        )));
    }

    let language = match params.lang.as_deref() {
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| AnalysisError::InvalidRequest(e.to_string()))?,
        None => cfg.default_language,
    };

    Ok(ReportOptions {
        months,
        language,
        chart: params.chart.unwrap_or(true),
        table: params.table.unwrap_or(true),
        finance: params.finance.unwrap_or(false),
        news: params.news.unwrap_or(true),
    })
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
    Query(params): Query<AnalysisParams>,
) -> Response {
    let options = match report_options(&params, &state.runtime_config.read()) {
        Ok(o) => o,
        Err(e) => return e.into_response(),
    };

    match run_analysis(&state, &query, &options).await {
        Ok(report) => {
            state.record_success();
            Json(report).into_response()
        }
        Err(e) => {
            warn!(query = %query, error = %e, "analysis failed");
            state.record_error(e.to_string(), Some(&query));
            e.into_response()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState::new(RuntimeConfig::default()).unwrap()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["news_enabled"], false);
        assert_eq!(body["analyses_served"], 0);
    }

    #[tokio::test]
    async fn resolve_known_company() {
        let (status, body) = get_json(app(), "/api/v1/tickers/resolve?q=Tesla").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticker"], "TSLA");
        assert_eq!(body["company_name"], "Tesla, Inc.");
    }

    #[tokio::test]
    async fn resolve_unknown_company_is_404() {
        let (status, body) = get_json(app(), "/api/v1/tickers/resolve?q=nvidia").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nvidia"));
    }

    #[tokio::test]
    async fn analysis_rejects_out_of_range_months() {
        let (status, body) = get_json(app(), "/api/v1/analysis/TSLA?months=13").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("months"));
    }

    #[tokio::test]
    async fn analysis_rejects_unknown_language() {
        let (status, _) = get_json(app(), "/api/v1/analysis/TSLA?lang=xx").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn options_default_from_config() {
        let mut cfg = RuntimeConfig::default();
        cfg.default_months = 3;
        cfg.default_language = Language::Japanese;
        let opts = report_options(&AnalysisParams::default(), &cfg).unwrap();
        assert_eq!(opts.months, 3);
        assert_eq!(opts.language, Language::Japanese);
        assert!(opts.chart && opts.table && opts.news);
        assert!(!opts.finance);
    }

    #[test]
    fn options_from_params() {
        let params = AnalysisParams {
            months: Some(12),
            lang: Some("EN".into()),
            chart: Some(false),
            finance: Some(true),
            ..AnalysisParams::default()
        };
        let opts = report_options(&params, &RuntimeConfig::default()).unwrap();
        assert_eq!(opts.months, 12);
        assert_eq!(opts.language, Language::English);
        assert!(!opts.chart);
        assert!(opts.finance);
    }

    #[test]
    fn error_status_mapping() {
        use crate::indicators::IndicatorError;
        assert_eq!(
            AnalysisError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalysisError::TickerNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AnalysisError::from(IndicatorError::InvalidWindow(0)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AnalysisError::Upstream(anyhow::anyhow!("timeout")).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
