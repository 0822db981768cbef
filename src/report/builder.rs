// =============================================================================
// Analysis Report
// =============================================================================
//
// Assembles everything a client renders for one ticker: header (name, current
// price), the enriched indicator rows, chart panels, summary table,
// fundamentals and news.  Optional sections are `None` when not requested so
// the JSON stays small.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::charts::{build_panels, ChartPanel};
use super::summary::{summary_table, SummaryTable};
use crate::finnhub::NewsItem;
use crate::i18n::{labels, Labels};
use crate::indicators::{IndicatorParams, IndicatorRow, RsiZone};
use crate::types::Language;
use crate::yahoo::{Fundamentals, Quote};

/// What the caller asked to include.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub months: u32,
    pub language: Language,
    pub chart: bool,
    pub table: bool,
    pub finance: bool,
    pub news: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceLine {
    pub label: &'static str,
    pub value: Option<f64>,
    /// Shown instead of the value when the provider had no live price.
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinanceSection {
    pub title: &'static str,
    pub metrics: Vec<MetricEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsEntry {
    pub headline: String,
    pub url: String,
    pub summary: Option<String>,
    /// `YYYY-MM-DD HH:MM`, UTC.
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsSection {
    pub title: &'static str,
    pub items: Vec<NewsEntry>,
    pub empty_message: Option<&'static str>,
}

/// Full analysis of one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub ticker: String,
    pub company_name: Option<String>,
    pub language: Language,
    pub months: u32,
    pub title: &'static str,
    pub current_price: PriceLine,
    pub latest_rsi: Option<f64>,
    pub rsi_zone: Option<RsiZone>,
    pub rows: Vec<IndicatorRow>,
    pub charts: Option<Vec<ChartPanel>>,
    pub summary: Option<SummaryTable>,
    pub finance: Option<FinanceSection>,
    pub news: Option<NewsSection>,
}

/// Inputs gathered by the analysis service.
pub struct ReportInput<'a> {
    pub ticker: &'a str,
    pub quote: &'a Quote,
    pub rows: Vec<IndicatorRow>,
    /// `None` when news was not fetched (not requested, no API key, or the
    /// provider failed).
    pub news: Option<Vec<NewsItem>>,
    pub options: &'a ReportOptions,
    /// Windows the rows were computed with; chart and table labels name them.
    pub params: &'a IndicatorParams,
    pub summary_rows: usize,
}

fn finance_section(f: &Fundamentals, t: &Labels) -> FinanceSection {
    let entry = |key, label, value| MetricEntry { key, label, value };
    FinanceSection {
        title: t.financial_summary,
        metrics: vec![
            entry("per", t.per, f.per),
            entry("eps", t.eps, f.eps),
            entry("pb", t.pb, f.pb),
            entry("op_margin", t.op_margin, f.op_margin),
            entry("total_revenue", t.total_revenue, f.total_revenue),
            entry("total_assets", t.total_assets, f.total_assets),
        ],
    }
}

fn news_section(items: Vec<NewsItem>, t: &Labels) -> NewsSection {
    let empty_message = items.is_empty().then_some(t.no_news);
    NewsSection {
        title: t.news_title,
        items: items
            .into_iter()
            .map(|n| NewsEntry {
                headline: n.headline.unwrap_or_else(|| t.news_no_summary.to_string()),
                url: n.url.unwrap_or_else(|| "#".to_string()),
                summary: n.summary,
                published_at: n.published_at.map(|d| d.format("%Y-%m-%d %H:%M").to_string()),
            })
            .collect(),
        empty_message,
    }
}

/// Assemble the report.  Pure apart from the report id and timestamp.
pub fn build_report(input: ReportInput<'_>) -> AnalysisReport {
    let ReportInput {
        ticker,
        quote,
        rows,
        news,
        options,
        params,
        summary_rows,
    } = input;
    let t = labels(options.language);

    let latest_rsi = rows.last().and_then(|r| r.rsi14);
    let price = quote.regular_market_price;

    AnalysisReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        ticker: ticker.to_string(),
        company_name: quote
            .short_name
            .clone()
            .or_else(|| crate::ticker_lookup::company_name(ticker).map(str::to_string)),
        language: options.language,
        months: options.months,
        title: t.title,
        current_price: PriceLine {
            label: t.current_price,
            value: price,
            message: price.is_none().then_some(t.price_unavailable),
        },
        latest_rsi,
        rsi_zone: latest_rsi.map(RsiZone::classify),
        charts: options
            .chart
            .then(|| build_panels(ticker, &rows, &quote.fundamentals, params)),
        summary: options
            .table
            .then(|| summary_table(&rows, summary_rows, t, params.rsi_period)),
        finance: options
            .finance
            .then(|| finance_section(&quote.fundamentals, t)),
        news: news.filter(|_| options.news).map(|items| news_section(items, t)),
        rows,
    }
}
