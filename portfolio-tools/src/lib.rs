//! Portfolio Tools
//!
//! Small utilities for trading against an exchange:
//! - Rounding prices onto the tick grid
//! - Printing positions and PnL for any [`Exchange`]
//! - An in-memory [`PaperExchange`] for simulation and demos

mod paper;
mod report;
mod ticks;

pub use paper::{PaperExchange, PaperPosition, Side};
pub use report::{print_positions_and_pnl, write_positions_and_pnl, Exchange};
pub use ticks::{round_down_to_tick, round_up_to_tick, TickError};
