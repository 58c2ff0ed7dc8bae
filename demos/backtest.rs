use std::{env, fs, path::Path, time::Instant};

use anyhow::{Context, Result};
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tradesim::prelude::*;

fn main() -> Result<()> {
    // Create simple logging subscriber
    let _guard = init_tracing()?;

    println!("Starting backtest...");

    let build_start = Instant::now();
    let mut env = environment()?;
    let build_time = build_start.elapsed();

    let run_start = Instant::now();
    let summary = env.evaluate_agent(&mut RsiThreshold::default())?;
    let run_time = run_start.elapsed();

    let metrics = PerformanceMetrics::from_summary(&summary);
    let path = Path::new("demos/reports/backtest");
    summary.write_json_to_dir(path)?;
    metrics.write_json_to_dir(path)?;

    let report = BacktestReport::new(&summary, &metrics).with_generated_at(chrono::Utc::now());
    report.write_markdown(path)?;
    println!("\n{report}");
    println!("\n--- Timings ---");
    println!("1. Environment build time: {build_time:?}");
    println!("2. Agent run time:         {run_time:?}");

    // The WorkerGuard ensures all buffered logs are flushed when dropped.
    drop(_guard);

    Ok(())
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() -> Result<Option<WorkerGuard>> {
    let app_name = "tradesim";

    // Detect if running in container
    let in_container =
        env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if in_container {
        // Container mode: log to stdout
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!("Logging to stdout (container mode)");
        return Ok(None);
    }

    // Local mode: log to file
    let log_dir = dirs::state_dir()
        .or_else(dirs::home_dir)
        .context("Failed to find a state or home directory")?
        .join(app_name)
        .join("logs");
    fs::create_dir_all(&log_dir)?;

    let timestamp = time::OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .context("Failed to format timestamp")?;
    let file_name = format!("{app_name}-{timestamp}.log");

    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_writer(non_blocking)
        .with_current_span(true)
        .with_thread_ids(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(log_file = %log_dir.join(&file_name).display(), "Logging to file (local mode)");
    Ok(Some(guard))
}

// ================================================================================================
// Helper Functions
// ================================================================================================

/// Replays `TRADESIM_FEED` when set, otherwise a synthetic feed.
fn environment() -> Result<Environment> {
    let feed = match env::var("TRADESIM_FEED") {
        Ok(path) => MarketFeed::from_json_file(&path)
            .with_context(|| format!("Failed to load feed from {path}"))?,
        Err(_) => FeedGenerator::new(GeneratorConfig::default())?.generate()?,
    };

    Environment::new(feed, EnvConfig::default()).context("Failed to build trading environment")
}
