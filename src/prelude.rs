// 1. Traits
pub use crate::agent::Agent;
pub use crate::gym::Simulator;
pub use crate::gym::adapter::DiscreteEnv;
pub use crate::math::indicator::StreamingIndicator;
pub use crate::report::io::{ReportName, ToJson};

// 2. The Core "Loop" Types
pub use crate::gym::{
    EnvStatus, Reward, Transition,
    adapter::{GymAdapter, RawTransition},
    trading::{
        action::{Action, InvalidActionPolicy},
        action_space::ActionSpace,
        config::{DrawdownThreshold, EnvConfig, ObservationScaling},
        env::Environment,
        ledger::{TradeLog, TradeRecord},
        observation::{Observation, ObservationFeature},
        state::EpisodeState,
        types::StepInfo,
    },
};

// 3. Market Data
pub use crate::data::domain::{Momentum, Price, Quantity, TradeSide, Volume};
pub use crate::data::feed::MarketFeed;
pub use crate::data::indicator::{IndicatorConfig, RsiWindow, SmaWindow, attach_indicators};
pub use crate::data::record::{MarketRecord, RawBar};
pub use crate::sim::generator::{FeedGenerator, GeneratorConfig};

// 4. Agents
pub use crate::agent::{
    AgentIdentifier, GridAxis,
    buy_and_hold::BuyAndHold,
    crossover::SmaCrossover,
    random::RandomAgent,
    rsi_threshold::{RsiThreshold, RsiThresholdGrid},
};

// 5. Reports
pub use crate::report::{
    leaderboard::{Leaderboard, LeaderboardRow},
    markdown::BacktestReport,
    performance::{PerformanceMetric, PerformanceMetrics},
    summary::BacktestSummary,
};

// 6. Errors
pub use crate::error::{AgentError, DataError, EnvError, IoError, TradeSimError, TradeSimResult};
