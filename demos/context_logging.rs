//! Contextual logging example
//!
//! Demonstrates static context, hooks, nested context names and sharing a
//! logger between threads.
//!
//! Run with: cargo run --example context_logging

use json_logger::global::time_hook;
use json_logger::prelude::*;
use std::thread;

fn main() -> Result<()> {
    println!("=== JSON Logger - Context Logging Example ===\n");

    let base = Logger::builder()
        .sink(Sink::stdout())
        .hook(time_hook)
        .build();

    println!("1. Static context, then hook, then call fields:");
    let service = base.with(|e| {
        e.string("service", "billing").string("region", "eu-west-1");
    });
    service.info_with_fields("invoice created", |e| {
        e.uint("invoice", 1042);
    });

    println!("\n2. Nested under a context name (hook stays at the root):");
    let request = service.with_context("request").with(|e| {
        e.string("request_id", "req-7f3a");
    });
    request.warn_with("slow upstream").uint("latency_ms", 812).write();

    println!("\n3. Back to flat output:");
    request.with_context("").info("request finished");

    println!("\n4. Derived loggers don't change their parent:");
    base.info("base logger is untouched");

    println!("\n5. Shared between threads:");
    thread::scope(|s| {
        for worker in 0..3u64 {
            let logger = service.with(move |e| {
                e.uint("worker", worker);
            });
            s.spawn(move || {
                logger.debug_with_fields("job done", |e| {
                    e.uint("jobs", worker * 10);
                });
            });
        }
    });

    service.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
