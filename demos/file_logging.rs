//! File logging example
//!
//! Demonstrates loading settings from `LogConfiguration.json` and writing JSON
//! lines to a file through the queued logger.
//!
//! Run with: cargo run --example file_logging

use rust_log_facade::prelude::*;
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - File Logging Example ===\n");

    let settings_path = std::env::temp_dir().join(rust_log_facade::core::DEFAULT_SETTINGS_FILE);
    let log_path = PathBuf::from("application.log");

    // Write a settings file the way an operator would
    let settings = LogSettings {
        min_level: Severity::Debug,
        sink: SinkConfig::File {
            path: log_path.clone(),
            format: OutputFormat::Json,
            timestamp_format: TimestampFormat::EventTime,
        },
        ..Default::default()
    };
    std::fs::write(&settings_path, settings.to_json()?)?;
    println!("1. Settings written to {}", settings_path.display());

    let logger = LoggerConfig::new("demo-002", "FileLogging")
        .delivery(DeliveryMode::Queued)
        .settings_path(&settings_path)
        .build()?;

    println!("2. Logging to {}:", log_path.display());
    logger.information("Application started", None, None);
    logger.debug("Loading configuration...", None, None);
    logger.warning("Using default settings for some options", None, None);

    // Simulate application work
    for i in 1..=5 {
        logger.information(
            "Processing item",
            Some(attrs!["Item" => i, "Total" => 5]),
            None,
        );
    }

    logger.information("All operations completed", None, None);

    // Flush to ensure all records are written
    logger.flush();

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the full log output", log_path.display());

    Ok(())
}
