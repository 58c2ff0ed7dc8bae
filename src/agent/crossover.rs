use serde::Serialize;

use crate::{
    agent::{Agent, AgentIdentifier},
    error::TradeSimResult,
    gym::trading::{
        action::Action,
        observation::{Observation, ObservationFeature},
    },
    math::indicator::{StreamingIndicator, StreamingSma},
};

// ================================================================================================
// Streaming SMA Crossover
// ================================================================================================

/// Trend-following policy on two streaming moving averages of the close feature.
///
/// Goes long when the fast average is above the slow one and exits when it drops below.
/// Holds until both averages are warm.
#[derive(Debug, Clone, Serialize)]
pub struct SmaCrossover {
    fast_period: u16,
    slow_period: u16,
    #[serde(skip)]
    fast_sma: StreamingSma,
    #[serde(skip)]
    slow_sma: StreamingSma,
}

impl SmaCrossover {
    pub fn new(fast_period: u16, slow_period: u16) -> Self {
        Self {
            fast_sma: StreamingSma::new(fast_period),
            slow_sma: StreamingSma::new(slow_period),
            fast_period,
            slow_period,
        }
    }
}

impl Agent for SmaCrossover {
    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::SmaCrossover
    }

    fn reset(&mut self) {
        self.fast_sma.reset();
        self.slow_sma.reset();
    }

    fn act(&mut self, obs: &Observation) -> TradeSimResult<Action> {
        let close = f64::from(obs[ObservationFeature::Close]);
        let fast = self.fast_sma.update(close);
        let slow = self.slow_sma.update(close);

        let (Some(fast), Some(slow)) = (fast, slow) else {
            // SMAs are not warm yet
            return Ok(Action::Hold);
        };

        let holding = obs[ObservationFeature::Position] > 0.0;
        let action = if !holding && fast > slow {
            Action::Buy
        } else if holding && fast < slow {
            Action::Sell
        } else {
            Action::Hold
        };
        Ok(action)
    }
}
