// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// Enriches a validated `Series` with every derived column the report renders:
//   MA10 / MA20 / MA60, Bollinger σ and bands, RSI14 and OBV.
//
// The pipeline is a pure function of (series, params): it holds no state
// between runs, so the same input always yields bit-identical rows and
// independent series may be processed concurrently.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{bollinger_bands, calculate_obv, calculate_rsi, moving_average, rolling_std};
use super::IndicatorError;
use crate::market_data::{Bar, Series};

fn default_short_ma() -> usize {
    10
}

fn default_mid_ma() -> usize {
    20
}

fn default_long_ma() -> usize {
    60
}

fn default_bb_period() -> usize {
    20
}

fn default_bb_num_std() -> f64 {
    2.0
}

fn default_rsi_period() -> usize {
    14
}

/// Window parameters for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_short_ma")]
    pub short_ma: usize,

    /// Also the middle Bollinger band.
    #[serde(default = "default_mid_ma")]
    pub mid_ma: usize,

    #[serde(default = "default_long_ma")]
    pub long_ma: usize,

    /// Look-back of the Bollinger standard deviation.
    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    /// Band distance from the middle, in standard deviations.
    #[serde(default = "default_bb_num_std")]
    pub bb_num_std: f64,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            short_ma: default_short_ma(),
            mid_ma: default_mid_ma(),
            long_ma: default_long_ma(),
            bb_period: default_bb_period(),
            bb_num_std: default_bb_num_std(),
            rsi_period: default_rsi_period(),
        }
    }
}

/// A bar plus every derived indicator value at that bar.
///
/// Field names follow the default windows.  With other `IndicatorParams`,
/// `ma10`/`ma20`/`ma60` hold the short/mid/long averages and `rsi14` the RSI
/// over `rsi_period`; display labels are built from the params instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: Bar,
    pub ma10: f64,
    pub ma20: f64,
    pub ma60: f64,
    pub bb_std: f64,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub rsi14: Option<f64>,
    pub obv: i64,
}

/// Stateless runner for the full indicator set.
#[derive(Debug, Clone, Default)]
pub struct IndicatorPipeline {
    params: IndicatorParams,
}

impl IndicatorPipeline {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Compute all indicator columns for `series`.
    ///
    /// Fails with `InsufficientData` on an empty series and `InvalidWindow`
    /// when any configured window is zero.
    pub fn run(&self, series: &Series) -> Result<Vec<IndicatorRow>, IndicatorError> {
        if series.is_empty() {
            return Err(IndicatorError::InsufficientData {
                got: 0,
                required: 1,
            });
        }

        let p = &self.params;
        let closes = series.closes();

        let ma_short = moving_average(&closes, p.short_ma)?;
        let ma_mid = moving_average(&closes, p.mid_ma)?;
        let ma_long = moving_average(&closes, p.long_ma)?;
        let std_dev = rolling_std(&closes, p.bb_period)?;
        let bands = bollinger_bands(&ma_mid, &std_dev, p.bb_num_std);
        let rsi = calculate_rsi(&closes, p.rsi_period)?;
        let obv = calculate_obv(series.bars());

        let rows: Vec<IndicatorRow> = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                bar: *bar,
                ma10: ma_short[i],
                ma20: ma_mid[i],
                ma60: ma_long[i],
                bb_std: std_dev[i],
                bb_upper: bands[i].map(|b| b.upper),
                bb_lower: bands[i].map(|b| b.lower),
                rsi14: rsi[i],
                obv: obv[i],
            })
            .collect();

        debug!(bars = rows.len(), "indicator pipeline complete");
        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Days::new(i as u64), c, c + 1.0, c - 1.0, c, 100))
            .collect();
        Series::new(bars).unwrap()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn empty_series_fails() {
        let empty = Series::new(Vec::new()).unwrap();
        assert_eq!(
            IndicatorPipeline::default().run(&empty),
            Err(IndicatorError::InsufficientData {
                got: 0,
                required: 1
            })
        );
    }

    #[test]
    fn output_length_matches_input() {
        let pipeline = IndicatorPipeline::default();
        for n in [1, 2, 13, 14, 15, 59, 60, 61, 130] {
            let rows = pipeline.run(&series(&wavy(n))).unwrap();
            assert_eq!(rows.len(), n);
        }
    }

    #[test]
    fn rows_preserve_bar_order() {
        let input = series(&wavy(25));
        let rows = IndicatorPipeline::default().run(&input).unwrap();
        for (row, bar) in rows.iter().zip(input.bars()) {
            assert_eq!(&row.bar, bar);
        }
    }

    #[test]
    fn single_bar_degenerate_values() {
        let rows = IndicatorPipeline::default().run(&series(&[42.0])).unwrap();
        let row = &rows[0];
        assert_eq!(row.ma10, 42.0);
        assert_eq!(row.ma20, 42.0);
        assert_eq!(row.ma60, 42.0);
        assert_eq!(row.bb_std, 0.0);
        assert_eq!(row.bb_upper, Some(42.0));
        assert_eq!(row.bb_lower, Some(42.0));
        assert_eq!(row.rsi14, None);
        assert_eq!(row.obv, 0);
    }

    #[test]
    fn constant_close_collapses_bands() {
        let c = 12.5;
        let rows = IndicatorPipeline::default().run(&series(&[c; 80])).unwrap();
        for row in &rows {
            assert!((row.ma10 - c).abs() < 1e-9);
            assert!((row.ma20 - c).abs() < 1e-9);
            assert!((row.ma60 - c).abs() < 1e-9);
            assert!(row.bb_std.abs() < 1e-9);
            assert!((row.bb_upper.unwrap() - c).abs() < 1e-9);
            assert!((row.bb_lower.unwrap() - c).abs() < 1e-9);
            assert_eq!(row.obv, 0);
        }
        for row in &rows[1..] {
            assert_eq!(row.rsi14, Some(50.0));
        }
    }

    #[test]
    fn bands_straddle_mid_ma() {
        let rows = IndicatorPipeline::default().run(&series(&wavy(90))).unwrap();
        for row in &rows {
            let (upper, lower) = (row.bb_upper.unwrap(), row.bb_lower.unwrap());
            assert!((upper - (row.ma20 + 2.0 * row.bb_std)).abs() < 1e-9);
            assert!((lower - (row.ma20 - 2.0 * row.bb_std)).abs() < 1e-9);
        }
    }

    #[test]
    fn rsi_saturates_on_monotonic_series() {
        let up: Vec<f64> = (1..=40).map(f64::from).collect();
        let rows = IndicatorPipeline::default().run(&series(&up)).unwrap();
        assert!(rows[1..].iter().all(|r| r.rsi14 == Some(100.0)));

        let down: Vec<f64> = (1..=40).rev().map(f64::from).collect();
        let rows = IndicatorPipeline::default().run(&series(&down)).unwrap();
        assert!(rows[1..].iter().all(|r| r.rsi14.unwrap().abs() < 1e-10));
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let input = series(&wavy(120));
        let pipeline = IndicatorPipeline::default();
        let first = pipeline.run(&input).unwrap();
        let second = pipeline.run(&input).unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.ma10.to_bits(), b.ma10.to_bits());
            assert_eq!(a.ma60.to_bits(), b.ma60.to_bits());
            assert_eq!(a.bb_std.to_bits(), b.bb_std.to_bits());
            assert_eq!(a.rsi14.map(f64::to_bits), b.rsi14.map(f64::to_bits));
            assert_eq!(a.obv, b.obv);
        }
    }

    #[test]
    fn zero_window_is_rejected() {
        let pipeline = IndicatorPipeline::new(IndicatorParams {
            rsi_period: 0,
            ..IndicatorParams::default()
        });
        assert_eq!(
            pipeline.run(&series(&[1.0, 2.0])),
            Err(IndicatorError::InvalidWindow(0))
        );
    }

    #[test]
    fn params_deserialise_with_defaults() {
        let params: IndicatorParams = serde_json::from_str(r#"{ "rsi_period": 9 }"#).unwrap();
        assert_eq!(params.rsi_period, 9);
        assert_eq!(params.long_ma, 60);
        assert!((params.bb_num_std - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn row_serialises_flat_with_nulls() {
        let rows = IndicatorPipeline::default().run(&series(&[10.0, 11.0])).unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["close"], 10.0);
        assert_eq!(json["date"], "2023-01-02");
        assert!(json["rsi14"].is_null());
        assert_eq!(json["obv"], 0);
    }
}
