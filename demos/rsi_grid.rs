use std::{path::Path, time::Instant};

use anyhow::Result;
use tradesim::prelude::*;

fn main() -> Result<()> {
    println!("Starting evaluation process...");

    let feed = FeedGenerator::new(GeneratorConfig::default().with_n_steps(5_000))?.generate()?;
    let mut env = Environment::new(feed, EnvConfig::default().with_initial_cash(100_000.0))?;

    let (stream_len, agents) = RsiThresholdGrid::baseline()?.build();
    let grid_start = Instant::now();
    let leaderboard = env.evaluate_agents(agents, 10, stream_len as u64)?;
    let grid_time = grid_start.elapsed();

    leaderboard.write_json_to_dir(Path::new("demos/reports/rsi_grid"))?;

    if let Some(best) = leaderboard.best(PerformanceMetric::TotalReturnPct) {
        println!(
            "Best total return: {:.2}% ({})",
            best.value, best.agent_parameterization
        );
    }

    println!("\n--- Evaluation Timings ---");
    println!("Grid of {stream_len} agents run time: {grid_time:?}");

    Ok(())
}
