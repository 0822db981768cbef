// =============================================================================
// Chart Panels
// =============================================================================
//
// Three vertically stacked panels sharing the date axis:
//   1. Close, short/mid/long MAs and Bollinger bands (area between bands filled)
//   2. RSI with 70 / 30 guide lines
//   3. On-Balance Volume
//
// Line labels name the configured windows (MA10, RSI (14) by default).
//
// Panels are plain data; the client decides how to draw them.  Missing values
// stay `null` so renderers leave a gap instead of plotting zero.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicators::rsi::{OVERBOUGHT, OVERSOLD};
use crate::indicators::{IndicatorParams, IndicatorRow};
use crate::yahoo::Fundamentals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One plotted line.
#[derive(Debug, Clone, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub style: LineStyle,
    pub color: Option<&'static str>,
    pub values: Vec<Option<f64>>,
}

/// Horizontal reference line.
#[derive(Debug, Clone, Serialize)]
pub struct GuideLine {
    pub value: f64,
    pub color: &'static str,
}

/// Shaded area between two lines of the same panel, by label.
#[derive(Debug, Clone, Serialize)]
pub struct AreaFill {
    pub lower: &'static str,
    pub upper: &'static str,
    pub color: &'static str,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPanel {
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub lines: Vec<LineSeries>,
    pub guides: Vec<GuideLine>,
    pub fill: Option<AreaFill>,
}

/// Format an optional metric the way chart titles show it.
pub fn fmt_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

fn line(
    label: impl Into<String>,
    style: LineStyle,
    color: Option<&'static str>,
    values: Vec<Option<f64>>,
) -> LineSeries {
    LineSeries {
        label: label.into(),
        style,
        color,
        values,
    }
}

/// Build the price, RSI and OBV panels for `rows` computed with `params`.
pub fn build_panels(
    ticker: &str,
    rows: &[IndicatorRow],
    fundamentals: &Fundamentals,
    params: &IndicatorParams,
) -> Vec<ChartPanel> {
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.bar.date).collect();
    let column = |f: fn(&IndicatorRow) -> Option<f64>| rows.iter().map(f).collect::<Vec<_>>();

    let price = ChartPanel {
        title: format!(
            "{ticker} Price with MA & Bollinger Bands (PER: {}, EPS: {})",
            fmt_metric(fundamentals.per),
            fmt_metric(fundamentals.eps)
        ),
        dates: dates.clone(),
        lines: vec![
            line("Close Price", LineStyle::Solid, None, column(|r| Some(r.bar.close))),
            line(format!("MA{}", params.short_ma), LineStyle::Dashed, None, column(|r| Some(r.ma10))),
            line(format!("MA{}", params.mid_ma), LineStyle::Dashed, None, column(|r| Some(r.ma20))),
            line(format!("MA{}", params.long_ma), LineStyle::Dashed, None, column(|r| Some(r.ma60))),
            line("Bollinger Upper", LineStyle::Dashed, Some("orange"), column(|r| r.bb_upper)),
            line("Bollinger Lower", LineStyle::Dashed, Some("orange"), column(|r| r.bb_lower)),
        ],
        guides: Vec::new(),
        fill: Some(AreaFill {
            lower: "Bollinger Lower",
            upper: "Bollinger Upper",
            color: "orange",
            opacity: 0.1,
        }),
    };

    let rsi = ChartPanel {
        title: format!("RSI ({}-day)", params.rsi_period),
        dates: dates.clone(),
        lines: vec![line(
            format!("RSI ({})", params.rsi_period),
            LineStyle::Solid,
            Some("purple"),
            column(|r| r.rsi14),
        )],
        guides: vec![
            GuideLine {
                value: OVERBOUGHT,
                color: "red",
            },
            GuideLine {
                value: OVERSOLD,
                color: "blue",
            },
        ],
        fill: None,
    };

    let obv = ChartPanel {
        title: "OBV".to_string(),
        dates,
        lines: vec![line(
            "On-Balance Volume (OBV)",
            LineStyle::Solid,
            Some("green"),
            column(|r| Some(r.obv as f64)),
        )],
        guides: Vec::new(),
        fill: None,
    };

    vec![price, rsi, obv]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorPipeline;
    use crate::market_data::{Bar, Series};
    use chrono::Days;

    fn rows(n: usize) -> Vec<IndicatorRow> {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 50.0 + (i % 7) as f64;
                Bar::new(start + Days::new(i as u64), c, c, c, c, 1_000)
            })
            .collect();
        IndicatorPipeline::default()
            .run(&Series::new(bars).unwrap())
            .unwrap()
    }

    #[test]
    fn three_aligned_panels() {
        let input = rows(30);
        let panels = build_panels("TSLA", &input, &Fundamentals::default(), &IndicatorParams::default());
        assert_eq!(panels.len(), 3);
        for panel in &panels {
            assert_eq!(panel.dates.len(), 30);
            for l in &panel.lines {
                assert_eq!(l.values.len(), 30);
            }
        }
        assert_eq!(panels[0].lines.len(), 6);
        assert!(panels[0].fill.is_some());
        let guides: Vec<f64> = panels[1].guides.iter().map(|g| g.value).collect();
        assert_eq!(guides, vec![70.0, 30.0]);
    }

    #[test]
    fn price_title_carries_fundamentals() {
        let fundamentals = Fundamentals {
            per: Some(45.234),
            ..Fundamentals::default()
        };
        let panels = build_panels("TSLA", &rows(3), &fundamentals, &IndicatorParams::default());
        assert_eq!(
            panels[0].title,
            "TSLA Price with MA & Bollinger Bands (PER: 45.23, EPS: N/A)"
        );
    }

    #[test]
    fn missing_rsi_stays_null() {
        let panels = build_panels("AAPL", &rows(5), &Fundamentals::default(), &IndicatorParams::default());
        let json = serde_json::to_value(&panels[1]).unwrap();
        assert!(json["lines"][0]["values"][0].is_null());
        assert!(json["lines"][0]["values"][1].is_number());
        assert_eq!(json["lines"][0]["style"], "solid");
    }

    #[test]
    fn labels_follow_configured_windows() {
        let params = IndicatorParams {
            short_ma: 5,
            mid_ma: 15,
            long_ma: 50,
            rsi_period: 9,
            ..IndicatorParams::default()
        };
        let panels = build_panels("TSLA", &rows(10), &Fundamentals::default(), &params);
        let price: Vec<&str> = panels[0].lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            price,
            vec!["Close Price", "MA5", "MA15", "MA50", "Bollinger Upper", "Bollinger Lower"]
        );
        assert_eq!(panels[1].title, "RSI (9-day)");
        assert_eq!(panels[1].lines[0].label, "RSI (9)");

        let defaults = build_panels("TSLA", &rows(10), &Fundamentals::default(), &IndicatorParams::default());
        assert_eq!(defaults[0].lines[1].label, "MA10");
        assert_eq!(defaults[1].lines[0].label, "RSI (14)");
    }
}
