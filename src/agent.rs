pub mod buy_and_hold;
pub mod crossover;
pub mod random;
pub mod rsi_threshold;

use ndarray::Array;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, str::FromStr};
use strum::{Display, EnumString};

use crate::{
    error::{AgentError, DataError, TradeSimResult},
    gym::trading::{action::Action, observation::Observation},
};

// ============================================================================
//  Shared Utilities
// ============================================================================

/// A utility for defining search space axes in grid searches.
/// It parses explicit string parameters to avoid floating point ambiguity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    start: f64,
    end: f64,
    step: f64,
    /// Number of decimal places to round to, inferred from the `step` string.
    precision: u32,
}

impl GridAxis {
    /// Create a new axis over `[start, end)` from string parameters.
    pub fn new(start: &str, end: &str, step: &str) -> TradeSimResult<Self> {
        let start_f = f64::from_str(start).map_err(DataError::from)?;
        let end_f = f64::from_str(end).map_err(DataError::from)?;
        let step_f = f64::from_str(step).map_err(DataError::from)?;

        if !(step_f.is_finite() && step_f > 0.0) {
            return Err(AgentError::InvalidInput(format!("grid step must be positive, got {step}")).into());
        }

        let precision = step.split('.').nth(1).map(|s| s.len() as u32).unwrap_or(0);

        Ok(Self {
            start: start_f,
            end: end_f,
            step: step_f,
            precision,
        })
    }

    pub fn generate(&self) -> Vec<f64> {
        let factor = 10_f64.powi(self.precision as i32);

        Array::range(self.start, self.end, self.step)
            .iter()
            .map(|val| (val * factor).round() / factor)
            .collect()
    }
}

// ============================================================================
//  Core Agent Definitions
// ============================================================================

/// Identifies which agent drove an episode in logs and reports.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentIdentifier {
    /// A custom user-defined agent.
    #[strum(to_string = "{0}")]
    Named(String),

    #[default]
    Random,
    BuyAndHold,
    RsiThreshold,
    SmaCrossover,
}

pub trait Agent {
    /// Decide on the next action based on the current observation.
    fn act(&mut self, obs: &Observation) -> TradeSimResult<Action>;

    /// Optional agent name for logging/debugging.
    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::Named("UnnamedAgent: override Agent::identifier()".to_string())
    }

    /// Reset internal state at the start of an episode. Default is no-op.
    fn reset(&mut self) {}
}

impl Agent for Box<dyn Agent> {
    fn act(&mut self, obs: &Observation) -> TradeSimResult<Action> {
        (**self).act(obs)
    }

    fn identifier(&self) -> AgentIdentifier {
        (**self).identifier()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_axis_rounds_to_step_precision() {
        let axis = GridAxis::new("20", "35", "5").unwrap();
        assert_eq!(axis.generate(), vec![20.0, 25.0, 30.0]);

        let fine = GridAxis::new("0", "0.3", "0.05").unwrap();
        assert_eq!(fine.generate()[3], 0.15);
    }

    #[test]
    fn grid_axis_rejects_bad_input() {
        assert!(GridAxis::new("a", "1", "0.1").is_err());
        assert!(GridAxis::new("0", "1", "0").is_err());
    }

    #[test]
    fn identifiers_display() {
        assert_eq!(AgentIdentifier::BuyAndHold.to_string(), "BUY_AND_HOLD");
        assert_eq!(
            AgentIdentifier::Named("custom".to_string()).to_string(),
            "custom"
        );
    }
}
