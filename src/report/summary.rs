// =============================================================================
// Tail-N Market Data Summary
// =============================================================================
//
// The last N bars with day-over-day change columns.  Changes are measured
// inside the tail window only, so its first bar (which has no prior reference
// in the window) is dropped: N bars in, N - 1 rows out.

use chrono::NaiveDate;
use serde::Serialize;

use crate::i18n::Labels;
use crate::indicators::IndicatorRow;

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub price_change: f64,
    /// `None` when the previous close is zero.
    pub price_change_pct: Option<f64>,
    pub rsi14: Option<f64>,
}

/// Localised summary table ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    pub title: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

/// Summarise the last `tail` rows.
pub fn summarize(rows: &[IndicatorRow], tail: usize) -> Vec<SummaryRow> {
    let start = rows.len().saturating_sub(tail);
    rows[start..]
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0].bar, &pair[1].bar);
            let change = cur.close - prev.close;
            SummaryRow {
                date: cur.date,
                open: cur.open,
                high: cur.high,
                low: cur.low,
                close: cur.close,
                volume: cur.volume,
                price_change: change,
                price_change_pct: (prev.close != 0.0).then(|| change / prev.close * 100.0),
                rsi14: pair[1].rsi14,
            }
        })
        .collect()
}

/// Build the table with column headers from `labels`; the RSI header names
/// `rsi_period`.
pub fn summary_table(rows: &[IndicatorRow], tail: usize, labels: &Labels, rsi_period: usize) -> SummaryTable {
    let mut columns: Vec<String> = [
        labels.date,
        labels.open,
        labels.high,
        labels.low,
        labels.close,
        labels.volume,
        labels.price_change,
        labels.price_change_pct,
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    columns.push(format!("{}({rsi_period})", labels.rsi));

    SummaryTable {
        title: labels.table_title,
        columns,
        rows: summarize(rows, tail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::labels;
    use crate::indicators::IndicatorPipeline;
    use crate::market_data::{Bar, Series};
    use crate::types::Language;
    use chrono::Days;

    fn rows(closes: &[f64]) -> Vec<IndicatorRow> {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Days::new(i as u64), c, c, c, c, 10 * i as u64))
            .collect();
        IndicatorPipeline::default()
            .run(&Series::new(bars).unwrap())
            .unwrap()
    }

    #[test]
    fn tail_drops_first_row_of_window() {
        let input = rows(&(1..=15).map(f64::from).collect::<Vec<_>>());
        let summary = summarize(&input, 10);
        assert_eq!(summary.len(), 9);
        assert_eq!(summary[0].close, 7.0);
        assert_eq!(summary.last().unwrap().close, 15.0);
        assert_eq!(summary.last().unwrap().date, input.last().unwrap().bar.date);
    }

    #[test]
    fn change_columns() {
        let summary = summarize(&rows(&[100.0, 110.0, 99.0]), 10);
        assert_eq!(summary.len(), 2);
        assert!((summary[0].price_change - 10.0).abs() < 1e-12);
        assert!((summary[0].price_change_pct.unwrap() - 10.0).abs() < 1e-12);
        assert!((summary[1].price_change + 11.0).abs() < 1e-12);
        assert!((summary[1].price_change_pct.unwrap() + 10.0).abs() < 1e-12);
        assert_eq!(summary[0].rsi14, Some(100.0));
    }

    #[test]
    fn short_inputs() {
        assert!(summarize(&rows(&[5.0]), 10).is_empty());
        assert!(summarize(&rows(&[5.0, 6.0]), 1).is_empty());
        assert!(summarize(&rows(&[5.0, 6.0]), 0).is_empty());
        assert!(summarize(&[], 10).is_empty());
    }

    #[test]
    fn table_headers_are_localised() {
        let input = rows(&[1.0, 2.0, 3.0]);
        let table = summary_table(&input, 10, labels(Language::Japanese), 14);
        assert_eq!(table.columns.len(), 9);
        assert_eq!(table.columns[8], "RSI(14)");
        assert_eq!(table.columns[4], "終値");
        assert_eq!(table.title, "📋 最新10日間の市場データ");
        assert_eq!(table.rows.len(), 2);

        let table = summary_table(&input, 10, labels(Language::English), 7);
        assert_eq!(table.columns[8], "RSI(7)");
    }
}
