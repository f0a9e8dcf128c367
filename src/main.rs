use std::io::{stderr, stdout};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use payment_bank::engine::{write_summaries, AsyncEngine};
use payment_bank::Bank;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: payment-bank [script].csv [log_level:optional] > [output].csv");
        eprintln!("Available log levels: off, error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let bank = Arc::new(Bank::new());
    let engine = AsyncEngine::new(bank);

    let timer = Instant::now();
    let summaries = engine.run(path).await?;
    let duration = timer.elapsed();

    info!("Processed script in: {duration:?}");

    write_summaries(stdout().lock(), &summaries)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or_else(|_| {
        eprintln!("Unknown log level [{level}], logging errors only");
        LevelFilter::ERROR
    })
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the results, logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
