//! File logging example
//!
//! Demonstrates configuring a file-backed logger from JSON and reading the
//! sink metrics afterwards.
//!
//! Run with: cargo run --example file_logging

use json_logger::prelude::*;

const CONFIG: &str = r#"{
    "levels": ["info", "warn", "error"],
    "output": "application.log",
    "context_name": "ctx"
}"#;

fn main() -> Result<()> {
    println!("=== JSON Logger - File Logging Example ===\n");

    let logger = LoggerConfig::from_json(CONFIG)?.build()?;

    println!("1. Logging to application.log:");
    logger.info("Application started");
    logger.debug("Loading configuration... (filtered)");
    logger.warn_with("Using default settings").string("option", "timeout").write();

    println!("\n2. Performing some operations:");
    for i in 1..=5u64 {
        logger.info_with_fields("Processing item", |e| {
            e.uint("item", i).uint("of", 5);
        });
        if i == 3 {
            logger.warn_with("Item took longer than expected").uint("item", i).write();
        }
    }
    logger.error("Failed to load optional plugin");
    logger.flush()?;

    let metrics = logger.sink().metrics();
    println!("\n3. Sink metrics:");
    println!("   Lines written: {}", metrics.lines_written());
    println!("   Bytes written: {}", metrics.bytes_written());
    println!("   Write errors: {}", metrics.write_errors());
    println!("   Encoder reuse: {:.1}%", metrics.reuse_rate());

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the output");

    Ok(())
}
