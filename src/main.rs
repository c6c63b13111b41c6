//! lobcore - Demo Binary
//!
//! Runs a short book session against a fresh order book and prints the
//! level updates each mutation produces.

use lobcore::types::price::{from_fixed, to_fixed};
use lobcore::{Order, OrderArena, OrderBook, Side};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("===========================================");
    println!("  lobcore - limit order book core");
    println!("===========================================");
    println!();

    let mut arena = OrderArena::with_capacity(1024);
    let mut book = OrderBook::with_capacity(256);

    let bid_px = to_fixed("50000.0").expect("valid price literal");
    let ask_px = to_fixed("50100.0").expect("valid price literal");

    println!("Adding resting orders...");
    let bid1 = arena.insert(Order::limit(1, Side::Buy, bid_px, to_fixed("1.0").unwrap(), 0));
    let bid2 = arena.insert(Order::iceberg(2, Side::Buy, bid_px, to_fixed("10.0").unwrap(), to_fixed("3.0").unwrap(), 1));
    let ask1 = arena.insert(Order::limit(3, Side::Sell, ask_px, to_fixed("0.5").unwrap(), 2));

    for key in [bid1, bid2, ask1] {
        let update = book.add_order(&mut arena, key);
        println!(
            "  {:?} level {} total={} visible={} hidden={} orders={} top={}",
            update.kind,
            from_fixed(update.level.price),
            from_fixed(update.level.total_volume),
            from_fixed(update.level.visible_volume),
            from_fixed(update.level.hidden_volume),
            update.level.order_count,
            update.top,
        );
    }

    println!();
    println!("Top of book:");
    println!("  best bid: {}", from_fixed(book.best_bid_price().unwrap()));
    println!("  best ask: {}", from_fixed(book.best_ask_price().unwrap()));
    println!("  spread:   {}", from_fixed(book.spread().unwrap()));

    println!();
    println!("Partial fill on the iceberg (3.0, draining 2.0 hidden)...");
    arena.get_mut(bid2).unwrap().order.reduce(300_000_000, 200_000_000, 100_000_000);
    let update = book.reduce_order(&mut arena, bid2, 300_000_000, 200_000_000, 100_000_000);
    println!(
        "  {:?} level {} total={} visible={} hidden={} top={}",
        update.kind,
        from_fixed(update.level.price),
        from_fixed(update.level.total_volume),
        from_fixed(update.level.visible_volume),
        from_fixed(update.level.hidden_volume),
        update.top,
    );

    println!();
    println!("Cancelling the resting ask...");
    let update = book.delete_order(&mut arena, ask1);
    println!(
        "  {:?} level {} total={} top={}",
        update.kind,
        from_fixed(update.level.price),
        from_fixed(update.level.total_volume),
        update.top,
    );
    println!("  best ask now: {:?}", book.best_ask_price());

    println!();
    println!("Parking a buy stop at 50500.0...");
    let stop = arena.insert(Order::stop(4, Side::Buy, to_fixed("50500.0").unwrap(), 25_000_000, 3));
    book.add_stop_order(&mut arena, stop);
    println!("  buy stop levels: {}", book.buy_stop_levels());

    println!();
    println!("State root: {}", hex::encode(book.state_root()));
}
