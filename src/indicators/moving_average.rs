// =============================================================================
// Simple Moving Average (SMA) & Rolling Standard Deviation
// =============================================================================
//
// Both statistics use an expanding-then-full trailing window: at index i the
// window covers closes[max(0, i + 1 - period) ..= i].  The first `period - 1`
// outputs are therefore computed over fewer bars instead of being dropped, so
// every output series has exactly one value per input close.
//
// Each window is summed directly rather than through a running sum, so that
// long series do not accumulate add/subtract rounding drift.
// =============================================================================

use super::IndicatorError;

/// Trailing window ending at `index`, truncated at the start of the slice.
fn trailing_window(values: &[f64], index: usize, period: usize) -> &[f64] {
    let start = (index + 1).saturating_sub(period);
    &values[start..=index]
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Compute the SMA series of `closes` over `period` bars.
///
/// # Example
/// `moving_average(&[2.0, 4.0, 6.0, 8.0], 3)` => `[2.0, 3.0, 4.0, 6.0]`
pub fn moving_average(closes: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidWindow(period));
    }

    Ok((0..closes.len())
        .map(|i| mean(trailing_window(closes, i, period)))
        .collect())
}

/// Compute the trailing sample standard deviation (n - 1 denominator) of
/// `closes` over `period` bars.
///
/// A window holding a single observation has no spread and yields `0.0`.
pub fn rolling_std(closes: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidWindow(period));
    }

    Ok((0..closes.len())
        .map(|i| {
            let window = trailing_window(closes, i, period);
            if window.len() < 2 {
                return 0.0;
            }
            let m = mean(window);
            let variance =
                window.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
            variance.sqrt()
        })
        .collect())
}
