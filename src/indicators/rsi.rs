// =============================================================================
// Relative Strength Index (RSI): Simple Rolling Means
// =============================================================================
//
// Momentum oscillator in [0, 100] built from trailing average gains and
// losses of the close.
//
// Step 1: Compute day-over-day price changes (deltas).  The first bar has no
//          prior close; it contributes a zero gain and a zero loss.
// Step 2: Split deltas into gains (positive part) and losses (negative part,
//          sign flipped).
// Step 3: Average gains and losses over the trailing `period` bars, using an
//          expanding window until `period` bars are available.
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use serde::Serialize;

use super::IndicatorError;

/// Upper guide line drawn on RSI charts.
pub const OVERBOUGHT: f64 = 70.0;
/// Lower guide line drawn on RSI charts.
pub const OVERSOLD: f64 = 30.0;

/// Compute the RSI series for `closes` over `period` bars.
///
/// The output has one entry per close.  Index 0 is always `None`: without a
/// prior close there is no price change to measure.
///
/// # Edge cases
/// - `period == 0` => `InvalidWindow`
/// - No losses in the window => 100.0
/// - No movement at all in the window => 50.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidWindow(period));
    }

    // --- Split deltas into gains / losses --------------------------------------
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let delta = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    // --- Trailing means ----------------------------------------------------------
    let avg_gains = super::moving_average(&gains, period)?;
    let avg_losses = super::moving_average(&losses, period)?;

    Ok(avg_gains
        .iter()
        .zip(&avg_losses)
        .enumerate()
        .map(|(i, (&g, &l))| if i == 0 { None } else { rsi_from_averages(g, l) })
        .collect())
}

/// Classification of an RSI reading against the 70/30 guide lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi >= OVERBOUGHT {
            Self::Overbought
        } else if rsi <= OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Oversold => write!(f, "OVERSOLD"),
        }
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// `None` only if the arithmetic produced a non-finite value.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
