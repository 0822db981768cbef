// ---------------------------------------------------------------------------
// Series -- validated, date-ordered sequence of daily bars
// ---------------------------------------------------------------------------

use tracing::debug;

use super::bar::{Bar, RawBar};
use crate::indicators::IndicatorError;

/// Immutable sequence of bars, strictly ascending by date.
///
/// Built once per analysis request and handed to the indicator pipeline; it is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Validate and wrap `bars`.
    ///
    /// Fails when dates are not strictly ascending or a close is not finite.
    /// The OHLC envelope (`low <= open/close <= high`) is trusted as delivered.
    pub fn new(bars: Vec<Bar>) -> Result<Self, IndicatorError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() {
                return Err(IndicatorError::UndefinedValue {
                    field: "close",
                    index,
                });
            }
            if index > 0 && bars[index - 1].date >= bar.date {
                return Err(IndicatorError::UnorderedSeries { index });
            }
        }
        Ok(Self { bars })
    }

    /// Build a series from provider rows, dropping every row with a missing
    /// field.
    pub fn from_raw(raw: &[RawBar]) -> Result<Self, IndicatorError> {
        let bars: Vec<Bar> = raw.iter().filter_map(RawBar::complete).collect();
        let dropped = raw.len() - bars.len();
        if dropped > 0 {
            debug!(dropped, kept = bars.len(), "dropped incomplete bars");
        }
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(d: u32, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        Bar::new(date, close, close, close, close, 100)
    }

    #[test]
    fn accepts_ascending_dates() {
        let series = Series::new(vec![bar(2, 1.0), bar(3, 2.0), bar(5, 3.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_series_is_valid_until_computed() {
        let series = Series::new(Vec::new()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = Series::new(vec![bar(2, 1.0), bar(2, 2.0)]).unwrap_err();
        assert_eq!(err, IndicatorError::UnorderedSeries { index: 1 });
    }

    #[test]
    fn rejects_descending_dates() {
        let err = Series::new(vec![bar(2, 1.0), bar(4, 2.0), bar(3, 2.5)]).unwrap_err();
        assert_eq!(err, IndicatorError::UnorderedSeries { index: 2 });
    }

    #[test]
    fn rejects_nan_close() {
        let err = Series::new(vec![bar(2, 1.0), bar(3, f64::NAN)]).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::UndefinedValue {
                field: "close",
                index: 1
            }
        );
    }

    #[test]
    fn from_raw_drops_incomplete_rows() {
        let mut raw: Vec<RawBar> = vec![bar(2, 1.0), bar(3, 2.0), bar(4, 3.0)]
            .into_iter()
            .map(RawBar::from)
            .collect();
        raw[1].volume = None;

        let series = Series::from_raw(&raw).unwrap();
        assert_eq!(series.closes(), vec![1.0, 3.0]);
    }
}
