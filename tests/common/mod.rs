#![allow(dead_code)]

use tradesim::prelude::*;

pub const EPS: f64 = 1e-9;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// A feed whose bars all open, close and range at the given closes.
pub fn flat_feed(closes: &[f64]) -> MarketFeed {
    MarketFeed::from_raw(
        closes
            .iter()
            .map(|&c| RawBar::ohlcv(c, c, c, c, 1_000_000.0)),
    )
    .expect("valid closes")
}

pub fn setup_env(closes: &[f64]) -> Environment {
    Environment::new(flat_feed(closes), EnvConfig::default()).expect("valid environment")
}

pub fn setup_synthetic_env(seed: u64, n_steps: usize) -> Environment {
    let cfg = GeneratorConfig::default()
        .with_seed(seed)
        .with_n_steps(n_steps)
        .with_base_price(100.0);
    let feed = FeedGenerator::new(cfg)
        .and_then(|mut g| g.generate())
        .expect("valid generator config");
    Environment::new(feed, EnvConfig::default()).expect("valid environment")
}

/// Steps `env` with `actions` cycled until the episode ends, returning every transition.
pub fn run_to_end(env: &mut Environment, actions: &[Action]) -> Vec<Transition> {
    let mut out = Vec::new();
    for action in actions.iter().cycle() {
        let t = env.step(*action);
        let done = t.done;
        out.push(t);
        if done {
            break;
        }
    }
    out
}
