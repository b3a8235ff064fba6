// ============================================================================
// Basic Usage
// Registers a ticker, rests some asks and buys against them
// ============================================================================

use matchvenue::prelude::*;

fn main() -> Result<(), OrderBookError> {
    let engine = MatchingEngine::new();
    engine.initialize(vec![TickerRegistrationCommand::new(
        "NVDA.US",
        "171.9434".parse().unwrap(),
    )]);

    // Rest three sell orders at different prices
    for (price, volume) in [("171.9733", 10), ("171.1442", 5), ("171.8431", 30)] {
        let ask = RegisterOrderCommand::new(
            OrderDirection::Ask,
            OrderType::Limit,
            "NVDA.US",
            Some(price.parse().unwrap()),
            volume,
        );
        engine.register_order(&ask)?;
    }
    println!("resting ask volume: {}", engine.get_volume("NVDA.US"));

    // Buy 15 at the best available prices
    let bid = RegisterOrderCommand::new(OrderDirection::Bid, OrderType::Market, "NVDA.US", None, 15);
    let result = engine.register_order(&bid)?;
    for execution in &result.executions {
        println!("bought {} @ {}", execution.volume, execution.price);
    }

    // The quote catches up asynchronously with the volume-weighted average
    std::thread::sleep(std::time::Duration::from_millis(50));
    let quote = engine.get_current_quote("NVDA.US")?;
    println!("current quote: {}", quote.price);

    let page = engine.get_order_book_snapshot(
        "NVDA.US",
        OrderDirection::Ask,
        Pagination::new(0, 10, SortOrder::Asc),
    )?;
    println!("remaining asks (best first):");
    for info in &page.elements {
        println!("  {} x {}", info.price, info.volume);
    }

    Ok(())
}
