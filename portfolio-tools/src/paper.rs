//! In-memory paper exchange
//!
//! Tracks net positions per instrument from simulated fills and values them at
//! the last mark. Long and short positions are both supported; a fill that
//! crosses through zero realizes PnL on the closed part and opens the rest at
//! the fill price.

use crate::report::Exchange;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Quantities smaller than this are treated as flat
const FLAT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Net position in one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperPosition {
    pub instrument_id: String,
    /// Signed: positive long, negative short
    pub quantity: f64,
    pub avg_entry_price: f64,
    pub mark_price: f64,
}

impl PaperPosition {
    fn new(instrument_id: &str, price: f64) -> Self {
        Self {
            instrument_id: instrument_id.to_string(),
            quantity: 0.0,
            avg_entry_price: price,
            mark_price: price,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.abs() < FLAT_EPSILON
    }

    pub fn unrealized_pnl(&self) -> f64 {
        if self.is_flat() {
            0.0
        } else {
            self.quantity * (self.mark_price - self.avg_entry_price)
        }
    }

    /// Apply a signed fill, returning the PnL it realized
    fn apply(&mut self, delta: f64, price: f64) -> f64 {
        let mut realized = 0.0;

        if self.is_flat() || self.quantity.signum() == delta.signum() {
            // opening or adding
            let held = self.quantity.abs();
            let added = delta.abs();
            self.avg_entry_price = if self.is_flat() {
                price
            } else {
                (held * self.avg_entry_price + added * price) / (held + added)
            };
            self.quantity += delta;
        } else {
            // reducing, closing or flipping
            let closed = self.quantity.abs().min(delta.abs());
            realized = closed * (price - self.avg_entry_price) * self.quantity.signum();

            let flips = delta.abs() > self.quantity.abs() + FLAT_EPSILON;
            self.quantity += delta;
            if flips {
                self.avg_entry_price = price;
            } else if self.is_flat() {
                self.quantity = 0.0;
            }
        }

        self.mark_price = price;
        realized
    }
}

/// Simulated exchange account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperExchange {
    positions: HashMap<String, PaperPosition>,
    realized_pnl: f64,
}

impl PaperExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fill of `volume` at `price`
    pub fn fill(&mut self, instrument_id: &str, side: Side, price: f64, volume: f64) -> anyhow::Result<()> {
        if instrument_id.trim().is_empty() {
            return Err(anyhow::anyhow!("Instrument id must not be empty"));
        }
        check_price("Fill", price)?;
        if !volume.is_finite() || volume <= 0.0 {
            return Err(anyhow::anyhow!("Fill volume must be positive, got {}", volume));
        }

        let delta = match side {
            Side::Buy => volume,
            Side::Sell => -volume,
        };

        let position = self
            .positions
            .entry(instrument_id.to_string())
            .or_insert_with(|| PaperPosition::new(instrument_id, price));
        let realized = position.apply(delta, price);
        self.realized_pnl += realized;

        info!(
            instrument_id,
            side = ?side,
            price,
            volume,
            position = position.quantity,
            realized,
            "Paper fill"
        );

        Ok(())
    }

    /// Update the mark price of an instrument already traded
    pub fn mark(&mut self, instrument_id: &str, price: f64) -> anyhow::Result<()> {
        check_price("Mark", price)?;
        if let Some(position) = self.positions.get_mut(instrument_id) {
            position.mark_price = price;
            debug!(instrument_id, price, "Marked");
        }
        Ok(())
    }

    pub fn position(&self, instrument_id: &str) -> Option<&PaperPosition> {
        self.positions.get(instrument_id)
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn unrealized_pnl(&self) -> f64 {
        self.positions.values().map(|p| p.unrealized_pnl()).sum()
    }
}

fn check_price(kind: &str, price: f64) -> anyhow::Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(anyhow::anyhow!("{} price must be positive, got {}", kind, price));
    }
    Ok(())
}

impl Exchange for PaperExchange {
    fn get_positions(&self) -> BTreeMap<String, f64> {
        self.positions
            .iter()
            .map(|(id, p)| (id.clone(), p.quantity))
            .collect()
    }

    fn get_pnl(&self) -> f64 {
        self.realized_pnl + self.unrealized_pnl()
    }
}
