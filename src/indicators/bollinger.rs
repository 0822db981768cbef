// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). The standard setting is a 20-period SMA with
// k = 2 standard deviations of the close.
//
// The bands are derived pointwise from already computed middle and σ series.

use serde::Serialize;

/// Upper and lower band at a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub lower: f64,
}

/// Combine a middle-band series and a standard-deviation series into bands.
///
/// Returns one entry per index of the shorter input.  An entry is `None` when
/// the middle value or σ at that index is undefined (NaN or infinite), or when
/// the resulting band would be.
pub fn bollinger_bands(middle: &[f64], std_dev: &[f64], num_std: f64) -> Vec<Option<BollingerBand>> {
    middle
        .iter()
        .zip(std_dev)
        .map(|(&mid, &sd)| {
            if !mid.is_finite() || !sd.is_finite() {
                return None;
            }
            let upper = mid + num_std * sd;
            let lower = mid - num_std * sd;
            (upper.is_finite() && lower.is_finite()).then_some(BollingerBand { upper, lower })
        })
        .collect()
}
