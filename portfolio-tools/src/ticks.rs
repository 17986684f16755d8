//! Price tick rounding

use thiserror::Error;

/// Quotients this close to a whole number count as exactly on a tick
const ON_TICK_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TickError {
    #[error("tick size must be a positive finite number, got {0}")]
    InvalidTickSize(f64),
}

fn ticks(price: f64, tick_size: f64) -> Result<f64, TickError> {
    if !tick_size.is_finite() || tick_size <= 0.0 {
        return Err(TickError::InvalidTickSize(tick_size));
    }

    let quotient = price / tick_size;
    let nearest = quotient.round();
    if (quotient - nearest).abs() < ON_TICK_EPSILON {
        Ok(nearest)
    } else {
        Ok(quotient)
    }
}

/// Round `price` down to the nearest tick, e.g. 0.97 at tick 0.10 becomes 0.90
pub fn round_down_to_tick(price: f64, tick_size: f64) -> Result<f64, TickError> {
    Ok(ticks(price, tick_size)?.floor() * tick_size)
}

/// Round `price` up to the nearest tick, e.g. 1.34 at tick 0.10 becomes 1.40
pub fn round_up_to_tick(price: f64, tick_size: f64) -> Result<f64, TickError> {
    Ok(ticks(price, tick_size)?.ceil() * tick_size)
}
