//! Single-asset trading simulator for reinforcement learning.
//!
//! An [`Environment`](gym::trading::env::Environment) replays a [`MarketFeed`](data::feed::MarketFeed)
//! one record per step, executes hold/buy/sell actions against a cash account and rewards the
//! cumulative return with a drawdown penalty. Feeds come from JSON files or from the seeded
//! [`FeedGenerator`](sim::generator::FeedGenerator).
//!
//! ```no_run
//! use tradesim::prelude::*;
//!
//! # fn main() -> TradeSimResult<()> {
//! let feed = FeedGenerator::new(GeneratorConfig::default())?.generate()?;
//! let mut env = Environment::new(feed, EnvConfig::default())?;
//!
//! let summary = env.evaluate_agent(&mut RsiThreshold::default())?;
//! let metrics = PerformanceMetrics::from_summary(&summary);
//! summary.write_json("results/backtest_summary.json")?;
//! metrics.write_json("results/performance_metrics.json")?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod data;
pub mod error;
pub mod gym;
pub mod macros;
pub mod math;
pub mod prelude;
pub mod report;
pub mod sim;
