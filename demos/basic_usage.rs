//! Basic logger usage example
//!
//! Demonstrates synchronous logging to the console at every severity.
//!
//! Run with: cargo run --example basic_usage

use rust_log_facade::prelude::*;
use rust_log_facade::warning;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Basic Usage Example ===\n");

    // Create a synchronous logger writing to the console
    let logger = Logger::builder()
        .application("demo-001", "BasicUsage")
        .sink(ConsoleSink::new())
        .build_sync()?;

    // Log messages at different levels
    println!("1. Logging at different levels:");
    logger.verbose("This is a verbose message", None, None);
    logger.debug("This is a debug message", None, None);
    logger.information("This is an information message", None, None);
    logger.warning("This is a warning message", None, None);
    logger.error("This is an error message", None, None, false);
    logger.fatal("This is a fatal message", None, None);

    println!("\n2. Attaching attributes:");
    logger.information(
        "Order {OrderId} placed",
        Some(attrs!["OrderId" => 1042, "Customer" => "alice"]),
        None,
    );
    warning!(logger, "Retry scheduled", "Attempt" => 2, "DelayMs" => 500);

    println!("\n3. Errors with a stack trace:");
    let failure = std::fs::read_to_string("/definitely/not/here")
        .map_err(|e| LogException::from_error(&e))
        .err();
    logger.error("Could not read the input file", None, failure, true);

    println!("\n4. Minimum level:");
    let quiet = Logger::builder()
        .application("demo-001", "BasicUsage")
        .min_level(Severity::Information)
        .sink(ConsoleSink::new().with_colors(false))
        .build_sync()?;
    println!("   Minimum level set to INFORMATION - verbose and debug won't show:");
    quiet.verbose("Verbose message (hidden)", None, None);
    quiet.debug("Debug message (hidden)", None, None);
    quiet.information("Information message (visible)", None, None);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
