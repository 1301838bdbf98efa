//! Queued logging example
//!
//! Demonstrates the queued logger: many producer threads, queue maintenance,
//! metrics and an explicit shutdown.
//!
//! Run with: cargo run --example queued_logging

use rust_log_facade::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Queued Logging Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .application("demo-003", "QueuedLogging")
            .sink(ConsoleSink::new())
            .capacity(10_000)
            .overflow_policy(OverflowPolicy::AlertAndDrop)
            .on_overflow(Arc::new(|count| {
                eprintln!("ALERT: {} records dropped", count);
            }))
            // short intervals so maintenance is visible in the metrics
            .rotation_interval(Duration::from_millis(50))
            .reclaim_interval(Duration::from_millis(100))
            .build_queued()?,
    );

    println!("1. Logging from 4 threads:");
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..5 {
                    logger.information(
                        "Worker step",
                        Some(attrs!["Worker" => worker, "Step" => i]),
                        None,
                    );
                    thread::sleep(Duration::from_millis(20));
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    println!("\n2. Pending before flush: {}", logger.pending());
    logger.flush();

    println!("\n3. Shutting down:");
    if !logger.shutdown(Duration::from_secs(5)) {
        eprintln!("Warning: logger shutdown timed out");
    }

    let metrics = logger.metrics();
    println!("   Enqueued:  {}", metrics.total_enqueued());
    println!("   Emitted:   {}", metrics.total_emitted());
    println!("   Dropped:   {}", metrics.dropped_count());
    println!("   Rotations: {}", metrics.rotations());
    println!("   Reclaims:  {}", metrics.reclaims());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
