use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tradesim::prelude::*;

mod common;
use common::{approx, setup_env, setup_synthetic_env};

// ================================================================================================
// Feed Loading
// ================================================================================================

#[test]
fn json_feed_with_aliases_and_defaults() {
    let json = r#"[
        {"open": 100.0, "high": 101.0, "low": 99.0, "close": 100.0, "volume": 5e5, "sma_20": 98.0, "rsi": 40.0},
        {"open": 100.0, "high": 112.0, "low": 99.0, "close": 110.0, "volume": 7e5},
        {"timestamp": "2024-01-03T00:00:00Z", "open": 110.0, "high": 111.0, "low": 85.0, "close": 90.0, "volume": 0.0}
    ]"#;

    let feed = MarketFeed::from_json_str(json).unwrap();

    assert_eq!(feed.len(), 3);
    assert_eq!(feed[0].moving_average, Price(98.0));
    assert_eq!(feed[0].momentum, Momentum(40.0));
    assert_eq!(feed[1].moving_average, feed[1].close);
    assert_eq!(feed[1].momentum, Momentum::NEUTRAL);
    assert!(feed[2].timestamp.is_some());

    let mut env = Environment::new(feed, EnvConfig::default()).unwrap();
    let obs = env.reset();
    assert!((f64::from(obs[ObservationFeature::Volume]) - 0.5).abs() < 1e-6);
    assert!((f64::from(obs[ObservationFeature::MovingAverage]) - 0.98).abs() < 1e-6);
    assert!((f64::from(obs[ObservationFeature::Momentum]) - 0.40).abs() < 1e-6);
}

#[test]
fn malformed_feeds_are_rejected() {
    assert!(MarketFeed::from_json_str("[]").is_err());
    assert!(MarketFeed::from_json_str("{not json").is_err());
    assert!(
        MarketFeed::from_json_str(
            r#"[{"open": 1.0, "high": 1.0, "low": 1.0, "close": -1.0, "volume": 1.0}]"#
        )
        .is_err()
    );
    assert!(
        MarketFeed::from_json_str(
            r#"[{"open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 1.0, "rsi": 140.0}]"#
        )
        .is_err()
    );
}

// ================================================================================================
// Agents and Reports
// ================================================================================================

#[test]
fn evaluate_agent_produces_the_scenario_summary() {
    struct BuyThenSell(usize);
    impl Agent for BuyThenSell {
        fn act(&mut self, _obs: &Observation) -> TradeSimResult<Action> {
            self.0 += 1;
            Ok(if self.0 == 1 { Action::Buy } else { Action::Sell })
        }
        fn reset(&mut self) {
            self.0 = 0;
        }
    }

    let mut env = setup_env(&[100.0, 110.0, 90.0]);
    let summary = env.evaluate_agent(&mut BuyThenSell(7)).unwrap();

    assert!(approx(summary.total_return_pct, 10.0));
    assert_eq!(summary.trade_count, 2);

    let metrics = PerformanceMetrics::from_summary(&summary);
    assert!(approx(metrics.win_rate_pct, 100.0));
    assert!(approx(metrics.avg_trade_return_pct, 10.0));
    assert_eq!(metrics.total_trades, 2);
}

#[test]
fn buy_and_hold_tracks_the_market() {
    let mut env = setup_env(&[100.0, 120.0, 150.0, 130.0]);

    let summary = env.evaluate_agent(&mut BuyAndHold::new()).unwrap();

    // Marked at the close of the last executed step (150).
    assert!(approx(summary.total_return_pct, 50.0));
    assert_eq!(summary.final_position_size, Quantity(10.0));
    assert_eq!(summary.trade_count, 1);
}

#[test]
fn random_agent_is_reproducible_across_environments() {
    let run = || {
        let mut env = setup_synthetic_env(5, 250);
        env.evaluate_agent(&mut RandomAgent::new(21)).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn summary_round_trips_through_json_on_disk() {
    let mut env = setup_synthetic_env(1, 200);
    let summary = env.evaluate_agent(&mut RsiThreshold::default()).unwrap();

    let dir = std::env::temp_dir().join(format!("tradesim-it-{}", std::process::id()));
    let path = summary.write_json_to_dir(&dir).unwrap();
    let back: BacktestSummary =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(back, summary);
    std::fs::remove_dir_all(dir).unwrap();
}

// ================================================================================================
// Batched Evaluation
// ================================================================================================

#[test]
fn evaluate_agents_ranks_by_total_return() {
    let mut env = setup_synthetic_env(11, 400);

    let seeds = (0..16u64).collect::<Vec<_>>();
    let expected_best = seeds
        .iter()
        .map(|&seed| {
            let mut solo = env.clone();
            solo.evaluate_agent(&mut RandomAgent::new(seed)).unwrap().total_return_pct
        })
        .fold(f64::NEG_INFINITY, f64::max);

    let agents = seeds
        .into_par_iter()
        .map(|seed| (seed as usize, RandomAgent::new(seed)));
    let leaderboard = env.evaluate_agents(agents, 3, 16).unwrap();

    let top = leaderboard.top(PerformanceMetric::TotalReturnPct).collect::<Vec<_>>();
    assert_eq!(top.len(), 3);
    assert!(approx(top[0].value, expected_best));
    assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
    assert_eq!(top.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn rsi_grid_runs_through_the_leaderboard() {
    let mut env = setup_synthetic_env(3, 300);
    let grid = RsiThresholdGrid::baseline()
        .unwrap()
        .with_oversold(GridAxis::new("20", "40", "10").unwrap())
        .with_overbought(GridAxis::new("60", "80", "10").unwrap());

    let (count, agents) = grid.build();
    let leaderboard = env.evaluate_agents(agents, 2, count as u64).unwrap();

    assert_eq!(count, 4);
    let best = leaderboard.best(PerformanceMetric::TotalReturnPct).unwrap();
    let params: serde_json::Value = serde_json::from_str(&best.agent_parameterization).unwrap();
    assert!(params["oversold"].is_number() && params["overbought"].is_number());
}

// ================================================================================================
// Framework Adapter
// ================================================================================================

#[test]
fn adapter_drives_a_full_episode_with_raw_actions() {
    let env = setup_env(&[100.0, 110.0, 90.0, 95.0]);
    let mut gym = GymAdapter::from_environment(env);

    let obs = gym.reset();
    assert_eq!(obs.len(), gym.observation_dim());

    let mut rewards = Vec::new();
    for raw in [1, 0, 2] {
        let t = gym.step(raw).unwrap();
        rewards.push(t.reward);
        if t.done {
            break;
        }
    }

    assert_eq!(rewards.len(), 3);
    assert!(approx(rewards[0], 0.0));
    assert!(approx(rewards[1], 0.10));
    // Sold at 90: worth 900, 18.18% below the 1100 peak.
    assert!(approx(rewards[2], -0.10 - 200.0 / 1100.0));
}

#[test]
fn adapter_policy_comes_from_the_config() {
    let feed = common::flat_feed(&[100.0, 101.0]);
    let cfg = EnvConfig::default().with_invalid_action_policy(InvalidActionPolicy::TreatAsHold);
    let mut gym = GymAdapter::from_environment(Environment::new(feed, cfg).unwrap());

    assert!(gym.step(99).is_ok());
    assert!(gym.into_inner().trade_log().is_empty());
}
