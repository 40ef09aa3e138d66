//! Basic logger usage example
//!
//! Demonstrates level masks and the three ways of attaching fields.
//!
//! Run with: cargo run --example basic_usage

use json_logger::prelude::*;
use json_logger::{set_level_text, set_message_key};
use std::io;

fn main() -> Result<()> {
    println!("=== JSON Logger - Basic Usage Example ===\n");

    // Every level except debug, keep running after fatal
    let logger = Logger::new(
        Some(Sink::stdout()),
        LogLevel::Info | LogLevel::Warn | LogLevel::Error | LogLevel::Fatal,
    )
    .with_exit_fn(|code| println!("   (exit({}) intercepted)", code));

    println!("1. Logging at different levels:");
    logger.info("This is an info message");
    logger.debug("This debug message is filtered out");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");

    println!("\n2. Fields callback:");
    logger.info_with_fields("request served", |e| {
        e.string("path", "/users").int("status", 200).float("ms", 12.5);
    });

    println!("\n3. Chained fields:");
    let err = Some(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
    logger
        .error_with("request failed")
        .string("path", "/orders")
        .err("err", err)
        .object_fn("retry", |r| {
            r.int("attempt", 2).bool("scheduled", true);
        })
        .write();

    println!("\n4. Any value:");
    logger
        .info_with("tags")
        .any("tags", vec!["fast", "json"])
        .any("missing", None::<i32>)
        .write();

    println!("\n5. Renamed level text and message key:");
    set_message_key("msg");
    set_level_text(LogLevel::Warn, "WARNING");
    logger.warn("renamed");
    logger.registry().reset();
    logger.warn("back to defaults");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
