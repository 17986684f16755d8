//! Positions and PnL reporting

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Read-only view of an exchange account
pub trait Exchange {
    /// Net quantity per instrument
    fn get_positions(&self) -> BTreeMap<String, f64>;

    /// Realized plus unrealized PnL
    fn get_pnl(&self) -> f64;
}

/// Write the positions table followed by the PnL line
pub fn write_positions_and_pnl<E, W>(exchange: &E, out: &mut W) -> io::Result<()>
where
    E: Exchange + ?Sized,
    W: Write,
{
    let positions = exchange.get_positions();
    let pnl = exchange.get_pnl();

    writeln!(out, "Positions:")?;
    for (instrument_id, quantity) in &positions {
        writeln!(out, "  {:<10}: {:>4.0}", instrument_id, quantity)?;
    }

    writeln!(out, "\nPnL: {:.2}", pnl)?;
    Ok(())
}

/// Print the positions table and PnL to stdout
pub fn print_positions_and_pnl<E: Exchange + ?Sized>(exchange: &E) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_positions_and_pnl(exchange, &mut out)
}
