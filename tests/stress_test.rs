//! Stress tests for the lobcore order book.
//!
//! These tests verify:
//! 1. The book sustains high mutation rates
//! 2. Structural invariants survive large random workloads
//! 3. Determinism: identical sequences produce identical state roots
//! 4. The book drains cleanly back to empty
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use lobcore::{Order, OrderArena, OrderBook, OrderKey, Side, UpdateKind};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Number of mutations for the main stress run
const STRESS_OP_COUNT: usize = 100_000;

/// Minimum acceptable throughput, lenient enough for debug builds
const MIN_THROUGHPUT: f64 = 10_000.0;

/// Base price: 50000.00000000 in fixed-point
const BASE_PRICE: u64 = 5_000_000_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Drive `count` deterministic mutations against a fresh book.
///
/// Roughly 60% adds, 20% reduces, 20% deletes, against a band of ~200
/// price levels per side. Same seed = same final book.
fn run_sequence(seed: u64, count: usize) -> (OrderArena, OrderBook, Vec<OrderKey>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut arena = OrderArena::with_capacity(count);
    let mut book = OrderBook::with_capacity(1024);
    let mut resting: Vec<OrderKey> = Vec::new();

    for i in 0..count {
        let roll = rng.gen_range(0..10);

        if roll < 6 || resting.is_empty() {
            // Add a resting order
            let is_buy = rng.gen_bool(0.5);
            let offset = rng.gen_range(0..200) * 100_000_000;
            let (side, price) = if is_buy {
                (Side::Buy, BASE_PRICE - offset)
            } else {
                (Side::Sell, BASE_PRICE + offset)
            };
            let quantity = rng.gen_range(100_000..=100_000_000);
            let key = arena.insert(Order::limit((i + 1) as u64, side, price, quantity, i as u64));
            book.add_order(&mut arena, key);
            resting.push(key);
        } else if roll < 8 {
            // Reduce a resting order by part of its remaining quantity
            let idx = rng.gen_range(0..resting.len());
            let key = resting[idx];
            let remaining = arena.get(key).unwrap().order.quantity;
            let delta = rng.gen_range(1..=remaining);
            arena.get_mut(key).unwrap().order.reduce(delta, 0, delta);
            let update = book.reduce_order(&mut arena, key, delta, 0, delta);
            if delta == remaining {
                resting.swap_remove(idx);
                arena.remove(key);
            } else {
                assert_eq!(update.kind, UpdateKind::Update);
            }
        } else {
            // Delete a resting order outright
            let idx = rng.gen_range(0..resting.len());
            let key = resting.swap_remove(idx);
            book.delete_order(&mut arena, key);
            arena.remove(key);
        }
    }

    (arena, book, resting)
}

/// Check the structural invariants the book promises after every operation.
fn audit(book: &OrderBook, arena: &OrderArena) {
    let mut member_orders = 0u64;

    for level in book
        .bids()
        .chain(book.asks())
        .chain(book.buy_stops())
        .chain(book.sell_stops())
    {
        assert!(level.total_volume > 0, "empty level left in a ladder");

        let mut total = 0u64;
        let mut hidden = 0u64;
        let mut visible = 0u64;
        let mut count = 0u64;
        for key in level.orders(arena) {
            let node = arena.get(key).unwrap();
            total += node.order.quantity;
            hidden += node.order.hidden;
            visible += node.order.visible;
            count += 1;

            let back = node.level.expect("member order lost its level pointer");
            assert_eq!(book.level(back).unwrap().price, level.price);
        }

        assert_eq!(level.total_volume, total, "total_volume out of sync");
        assert_eq!(level.hidden_volume, hidden, "hidden_volume out of sync");
        assert_eq!(level.visible_volume, visible, "visible_volume out of sync");
        assert_eq!(level.order_count, count, "order_count out of sync");
        assert_eq!(level.hidden_volume + level.visible_volume, level.total_volume);
        member_orders += count;
    }

    // Best caches agree with the ladders
    match book.best_bid_price() {
        Some(best) => assert_eq!(best, book.bids().map(|l| l.price).max().unwrap()),
        None => assert_eq!(book.bids().count(), 0),
    }
    match book.best_ask_price() {
        Some(best) => assert_eq!(best, book.asks().map(|l| l.price).min().unwrap()),
        None => assert_eq!(book.asks().count(), 0),
    }

    assert!(member_orders as usize <= arena.len());
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Main stress test: drive a large mixed add/reduce/delete workload.
#[test]
fn stress_mixed_workload() {
    println!("\n=== STRESS TEST: {} mixed mutations ===\n", STRESS_OP_COUNT);

    let start = Instant::now();
    let (arena, book, resting) = run_sequence(42, STRESS_OP_COUNT);
    let elapsed = start.elapsed();

    let throughput = STRESS_OP_COUNT as f64 / elapsed.as_secs_f64();
    let avg_latency_us = elapsed.as_micros() as f64 / STRESS_OP_COUNT as f64;

    println!("  Resting orders:    {:>12}", resting.len());
    println!("  Bid levels:        {:>12}", book.bid_levels());
    println!("  Ask levels:        {:>12}", book.ask_levels());
    println!();
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!("  Throughput:        {:>12.0} ops/sec", throughput);
    println!("  Avg latency:       {:>12.2} us/op", avg_latency_us);
    println!();
    println!("  State root:        {}", hex::encode(book.state_root()));

    audit(&book, &arena);

    assert!(
        throughput >= MIN_THROUGHPUT,
        "Throughput {:.0} ops/sec below minimum {:.0}",
        throughput,
        MIN_THROUGHPUT
    );
    assert!(!book.is_empty(), "Expected residual depth after the run");

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Verify determinism: the same sequence produces an identical state root.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_COUNT: usize = 10_000;
    const SEED: u64 = 12345;

    let (_, book1, _) = run_sequence(SEED, TEST_COUNT);
    let (_, book2, _) = run_sequence(SEED, TEST_COUNT);

    let root1 = book1.state_root();
    let root2 = book2.state_root();

    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));

    assert_eq!(root1, root2, "State roots must match for determinism");

    let (_, book3, _) = run_sequence(SEED + 1, TEST_COUNT);
    let root3 = book3.state_root();
    println!("  Different seed:   {}", hex::encode(root3));
    assert_ne!(root1, root3, "Different seeds should produce different books");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}

/// Deleting every resting order drains the book back to empty.
#[test]
fn stress_drain_to_empty() {
    println!("\n=== DRAIN TEST ===\n");

    let (mut arena, mut book, resting) = run_sequence(7, 20_000);
    println!("  Resting orders before drain: {}", resting.len());

    for key in resting {
        book.delete_order(&mut arena, key);
        arena.remove(key);
    }

    assert!(book.is_empty());
    assert!(book.best_bid().is_none());
    assert!(book.best_ask().is_none());
    assert_eq!(book.bid_levels(), 0);
    assert_eq!(book.ask_levels(), 0);
    assert!(arena.is_empty());

    println!("  Book drained cleanly");
    println!("\n=== DRAIN TEST PASSED ===\n");
}

/// Stop ladders under load: park, reduce and cancel pending stops.
#[test]
fn stress_stop_ladders() {
    println!("\n=== STOP LADDER TEST ===\n");

    const STOP_COUNT: usize = 5_000;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut arena = OrderArena::with_capacity(STOP_COUNT);
    let mut book = OrderBook::with_capacity(512);
    let mut pending: Vec<OrderKey> = Vec::new();

    for i in 0..STOP_COUNT {
        let is_buy = rng.gen_bool(0.5);
        let offset = rng.gen_range(0..100) * 100_000_000;
        let (side, price) = if is_buy {
            (Side::Buy, BASE_PRICE + offset)
        } else {
            (Side::Sell, BASE_PRICE - offset)
        };
        let quantity = rng.gen_range(100_000..=10_000_000);
        let key = arena.insert(Order::stop((i + 1) as u64, side, price, quantity, i as u64));
        book.add_stop_order(&mut arena, key);
        pending.push(key);
    }

    println!("  Buy stop levels:  {}", book.buy_stop_levels());
    println!("  Sell stop levels: {}", book.sell_stop_levels());
    audit(&book, &arena);

    // Resting side untouched by stop traffic
    assert_eq!(book.bid_levels(), 0);
    assert_eq!(book.ask_levels(), 0);
    assert!(book.best_bid().is_none());

    for key in pending {
        book.delete_stop_order(&mut arena, key);
        arena.remove(key);
    }
    assert!(book.is_empty());

    println!("  Stop ladders drained cleanly");
    println!("\n=== STOP LADDER TEST PASSED ===\n");
}
