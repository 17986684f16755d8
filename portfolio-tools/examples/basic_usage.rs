//! Example usage of the portfolio tools

use portfolio_tools::{
    print_positions_and_pnl, round_down_to_tick, round_up_to_tick, PaperExchange, Side,
};

fn main() -> anyhow::Result<()> {
    println!("=== Portfolio Tools Example ===\n");

    // Example 1: Quote on the tick grid around a fair value
    let tick_size = 0.10;
    let fair_value = 100.07;
    let bid = round_down_to_tick(fair_value - 0.05, tick_size)?;
    let ask = round_up_to_tick(fair_value + 0.05, tick_size)?;
    println!("Fair value {:.2} quoted {:.2} / {:.2}\n", fair_value, bid, ask);

    // Example 2: Trade on a paper exchange
    let mut exchange = PaperExchange::new();
    exchange.fill("PHILIPS_A", Side::Buy, bid, 20.0)?;
    exchange.fill("PHILIPS_A", Side::Sell, ask, 5.0)?;
    exchange.fill("PHILIPS_B", Side::Sell, ask, 10.0)?;
    exchange.mark("PHILIPS_A", 100.3)?;
    exchange.mark("PHILIPS_B", 99.9)?;

    // Example 3: Report
    print_positions_and_pnl(&exchange)?;

    Ok(())
}
