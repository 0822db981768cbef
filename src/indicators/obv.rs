// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// OBV accumulates volume signed by the direction of the close:
//   direction_t = +1 if close_t > close_{t-1}
//                 -1 if close_t < close_{t-1}
//                  0 otherwise (and for the first bar)
//   OBV_t       = Σ volume_i * direction_i   for i <= t
//
// Rising OBV with flat price hints at accumulation; falling OBV at
// distribution.

use crate::market_data::Bar;

/// Price direction of each bar relative to the previous close.
pub fn directions(bars: &[Bar]) -> Vec<i8> {
    let mut result = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let direction = match i.checked_sub(1).map(|p| bars[p].close) {
            Some(prev) if bar.close > prev => 1,
            Some(prev) if bar.close < prev => -1,
            _ => 0,
        };
        result.push(direction);
    }
    result
}

/// Compute the cumulative OBV series, one value per bar.
pub fn calculate_obv(bars: &[Bar]) -> Vec<i64> {
    let mut running: i64 = 0;
    bars.iter()
        .zip(directions(bars))
        .map(|(bar, direction)| {
            let volume = i64::try_from(bar.volume).unwrap_or(i64::MAX);
            running = running.saturating_add(volume.saturating_mul(i64::from(direction)));
            running
        })
        .collect()
}
