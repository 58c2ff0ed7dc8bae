use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::ParallelIterator;
use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, info, warn};

use crate::{
    agent::Agent,
    data::feed::MarketFeed,
    error::{EnvError, TradeSimError, TradeSimResult},
    gym::{
        EnvStatus, Reward, Simulator, Transition,
        trading::{
            action::Action, config::EnvConfig, ledger::TradeLog, observation::Observation,
            state::EpisodeState,
        },
    },
    report::{
        leaderboard::{AgentLeaderboard, Leaderboard, LeaderboardEntry},
        performance::{PerformanceMetric, PerformanceMetrics},
        summary::BacktestSummary,
    },
};

/// Single-asset trading simulator over a fixed market feed.
///
/// Each step executes the action at the close of the record under the cursor, advances the
/// cursor by one and rewards the cumulative return of the account so far. Net worth is marked
/// at the close the action executed at, not at the close of the record moved onto.
///
/// The environment holds a fresh episode from construction on, so `step` may be called
/// without a prior `reset`. Cloning is cheap: the feed is shared.
#[derive(Clone, Debug)]
pub struct Environment {
    // === Public (configurable) ===
    config: EnvConfig,

    // === Internal only ===
    /// Immutable market data backing every episode.
    feed: MarketFeed,

    /// Account state of the running episode. Replaced on every reset.
    state: EpisodeState,
}

// ================================================================================================
// Building
// ================================================================================================

impl Environment {
    /// # Errors
    ///
    /// [`EnvError::Configuration`] if the configuration is invalid (e.g. non-positive initial
    /// cash). Emptiness of the feed is already excluded by [`MarketFeed`].
    pub fn new(feed: MarketFeed, config: EnvConfig) -> TradeSimResult<Self> {
        config.validate()?;
        Ok(Self {
            state: EpisodeState::new(config.initial_cash()),
            config,
            feed,
        })
    }
}

// ================================================================================================
// Episode Loop
// ================================================================================================

impl Environment {
    /// Starts a fresh episode at the first record. Idempotent.
    #[tracing::instrument(skip(self), fields(records = self.feed.len()))]
    pub fn reset(&mut self) -> Observation {
        self.state = EpisodeState::new(self.config.initial_cash());
        debug!("Episode reset");
        self.observe()
    }

    /// Observation of the record under the cursor, or the zero vector past the feed end.
    pub fn observe(&self) -> Observation {
        self.feed
            .get(self.state.cursor())
            .map_or_else(Observation::zeros, |record| {
                Observation::from_record(
                    record,
                    self.feed.anchor_close().0,
                    self.state.position_size(),
                    &self.config.observation_scaling(),
                )
            })
    }

    /// Executes `action` at the current close and advances the cursor.
    ///
    /// Stepping a terminal episode is a no-op returning zero reward, `done = true` and no info.
    /// A BUY the cash cannot cover and a SELL without a position are silent no-ops as well.
    pub fn step(&mut self, action: Action) -> Transition {
        if self.status().is_terminal() {
            return Transition::terminal(self.observe());
        }

        let cursor = self.state.cursor();
        let close = self.feed[cursor].close;

        let fill = match action {
            Action::Hold => None,
            Action::Buy => self.state.buy(close),
            Action::Sell => self.state.sell(close),
        };
        if let Some(fill) = fill {
            debug!(
                step = cursor,
                side = %fill.side,
                price = %fill.price,
                quantity = %fill.quantity,
                "Trade executed"
            );
        }

        self.state.advance();
        let net_worth = self.state.mark_to_market(close);

        Transition {
            observation: self.observe(),
            reward: self.reward(net_worth),
            done: self.status().is_terminal(),
            info: Some(self.state.info()),
        }
    }

    /// `Terminal` once the cursor reached the last record: there is nothing left to advance onto.
    pub fn status(&self) -> EnvStatus {
        if self.state.cursor() + 1 >= self.feed.len() {
            EnvStatus::Terminal
        } else {
            EnvStatus::Active
        }
    }

    fn reward(&self, net_worth: f64) -> Reward {
        let initial_cash = self.config.initial_cash();
        let reward = Reward((net_worth - initial_cash) / initial_cash);

        let drawdown = self.state.drawdown();
        if self.config.drawdown_threshold().is_exceeded_by(drawdown) {
            reward - drawdown
        } else {
            reward
        }
    }
}

impl Simulator for Environment {
    fn reset(&mut self) -> Observation {
        Environment::reset(self)
    }

    fn observe(&self) -> Observation {
        Environment::observe(self)
    }

    fn step(&mut self, action: Action) -> Transition {
        Environment::step(self, action)
    }

    fn status(&self) -> EnvStatus {
        Environment::status(self)
    }
}

// ================================================================================================
// Accessors
// ================================================================================================

impl Environment {
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn feed(&self) -> &MarketFeed {
        &self.feed
    }

    pub fn episode_state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn trade_log(&self) -> &TradeLog {
        self.state.trade_log()
    }

    /// Result summary of the episode as it currently stands.
    pub fn summary(&self) -> BacktestSummary {
        BacktestSummary::new(self.config.initial_cash(), &self.state)
    }
}

// ================================================================================================
// Agent Evaluation
// ================================================================================================

impl Environment {
    /// Runs one full episode driven by `agent` and summarizes it.
    pub fn evaluate_agent<T: Agent>(&mut self, agent: &mut T) -> TradeSimResult<BacktestSummary> {
        self.run_episode(agent)?;
        Ok(self.summary())
    }

    /// Evaluates a stream of agents in parallel, returning a leaderboard of the top performers.
    ///
    /// Every agent runs on its own clone of this environment, so workers share nothing but the
    /// feed. A min-heap of the top `top_k` entries per metric bounds memory regardless of how many
    /// agents are streamed through.
    ///
    /// # Arguments
    ///
    /// * `agents` - A parallel iterator yielding `(usize, Agent)`. The `usize` is treated as
    ///   the unique **Agent UID**, typically produced by `.enumerate()` on the parameter grid.
    /// * `top_k` - The maximum number of agents to retain per metric.
    /// * `stream_len` - The total number of agents expected. Only used to size the progress bar.
    pub fn evaluate_agents<T>(
        &mut self,
        agents: impl ParallelIterator<Item = (usize, T)>,
        top_k: usize,
        stream_len: u64,
    ) -> TradeSimResult<Leaderboard>
    where
        T: Agent + Send + Serialize,
    {
        self.reset();
        let pb = progress_bar(stream_len)?;
        pb.set_message("Running evaluation...");

        let env = &*self;
        let agent_leaderboard = agents
            .try_fold(
                || AgentLeaderboard::new(top_k),
                |mut board, (uid, mut agent)| {
                    let entries = env.worker(&mut agent, uid as u64)?;
                    board.update(&entries, agent);
                    pb.inc(1);
                    Ok(board)
                },
            )
            .try_reduce(
                || AgentLeaderboard::new(top_k),
                |a_board, b_board| Ok::<_, TradeSimError>(a_board.merge(b_board)),
            )?;

        pb.finish_with_message("Evaluation complete.");
        agent_leaderboard.try_into()
    }

    fn run_episode<T: Agent>(&mut self, agent: &mut T) -> TradeSimResult<()> {
        agent.reset();
        let mut obs = self.reset();

        loop {
            let action = agent.act(&obs)?;
            let transition = self.step(action);
            obs = transition.observation;
            if transition.done {
                break;
            }
        }

        info!(
            agent = %agent.identifier(),
            steps = self.state.cursor(),
            net_worth = self.state.net_worth(),
            trades = self.state.trade_log().len(),
            "Episode complete"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self, agent), fields(agent_uid = %agent_uid))]
    fn worker<T: Agent>(&self, agent: &mut T, agent_uid: u64) -> TradeSimResult<Vec<LeaderboardEntry>> {
        let mut thread_env = self.clone();
        let summary = thread_env.evaluate_agent(agent)?;
        let metrics = PerformanceMetrics::from_summary(&summary);

        let mut entries = Vec::with_capacity(PerformanceMetric::COUNT);
        for metric in PerformanceMetric::iter() {
            let value = metric.value(&summary, &metrics);
            if value.is_finite() {
                entries.push(LeaderboardEntry::new(agent_uid, metric, value));
            } else {
                warn!(?metric, "Metric produced non-finite value");
            }
        }

        Ok(entries)
    }
}

// ================================================================================================
// Helper Functions
// ================================================================================================

fn progress_bar(capacity: u64) -> TradeSimResult<ProgressBar> {
    let bar = ProgressBar::new(capacity);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta_precise}) {msg}")
            .map_err(EnvError::ProgressBar)?
            .progress_chars("#>-"));
    Ok(bar)
}
