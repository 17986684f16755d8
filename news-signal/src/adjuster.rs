//! Signal adjustment
//!
//! A small, three-valued bias. Neutral or low-confidence readings never move
//! a trade.

use common::SentimentLabel;

/// Confidence must be strictly above this for sentiment to adjust a trade
pub const ADJUSTMENT_CONFIDENCE: f64 = 0.9;

/// Size of the bias applied to a confident positive or negative reading
pub const ADJUSTMENT_STEP: f64 = 0.1;

/// Map a sentiment reading to a bounded trading bias
///
/// Returns `+0.1` or `-0.1` only for positive or negative readings with
/// confidence strictly above 0.9, otherwise `0.0`.
pub fn adjust_output(label: SentimentLabel, confidence: f64) -> f64 {
    if confidence > ADJUSTMENT_CONFIDENCE {
        match label {
            SentimentLabel::Positive => return ADJUSTMENT_STEP,
            SentimentLabel::Negative => return -ADJUSTMENT_STEP,
            SentimentLabel::Neutral => {}
        }
    }
    0.0
}
