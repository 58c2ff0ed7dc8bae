use itertools::iproduct;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::{
    agent::{Agent, AgentIdentifier, GridAxis},
    error::{AgentError, TradeSimResult},
    gym::trading::{
        action::Action,
        config::ObservationScaling,
        observation::{Observation, ObservationFeature},
    },
};

// ================================================================================================
// RSI Threshold Policy
// ================================================================================================

/// Mean-reversion policy on the momentum feature.
///
/// Buys when flat and the momentum reading drops below `oversold`, sells the position once it
/// rises above `overbought`. Thresholds are on the `[0, 100]` oscillator scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RsiThreshold {
    oversold: f64,
    overbought: f64,
    #[serde(skip)]
    scaling: ObservationScaling,
}

impl Default for RsiThreshold {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            scaling: ObservationScaling::default(),
        }
    }
}

impl RsiThreshold {
    pub fn new(oversold: f64, overbought: f64) -> TradeSimResult<Self> {
        Self::default()
            .with_oversold(oversold)
            .with_overbought(overbought)
            .validated()
    }

    pub fn with_oversold(self, oversold: f64) -> Self {
        Self { oversold, ..self }
    }

    pub fn with_overbought(self, overbought: f64) -> Self {
        Self { overbought, ..self }
    }

    /// Must match the scaling of the environment the agent observes.
    pub fn with_scaling(self, scaling: ObservationScaling) -> Self {
        Self { scaling, ..self }
    }

    pub fn oversold(&self) -> f64 {
        self.oversold
    }

    pub fn overbought(&self) -> f64 {
        self.overbought
    }

    fn validated(self) -> TradeSimResult<Self> {
        let in_range = |x: f64| (0.0..=100.0).contains(&x);
        if in_range(self.oversold) && in_range(self.overbought) && self.oversold < self.overbought {
            Ok(self)
        } else {
            Err(AgentError::InvalidInput(format!(
                "thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                self.oversold, self.overbought
            ))
            .into())
        }
    }
}

impl Agent for RsiThreshold {
    fn act(&mut self, obs: &Observation) -> TradeSimResult<Action> {
        let momentum = f64::from(obs[ObservationFeature::Momentum]) * self.scaling.momentum;
        let holding = obs[ObservationFeature::Position] > 0.0;

        let action = match (holding, momentum) {
            (false, m) if m < self.oversold => Action::Buy,
            (true, m) if m > self.overbought => Action::Sell,
            _ => Action::Hold,
        };
        Ok(action)
    }

    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::RsiThreshold
    }
}

// ================================================================================================
// Parameter Grid
// ================================================================================================

/// Grid of [`RsiThreshold`] parameterizations for [`crate::gym::trading::env::Environment::evaluate_agents`].
#[derive(Debug, Clone, PartialEq)]
pub struct RsiThresholdGrid {
    oversold: GridAxis,
    overbought: GridAxis,
}

impl RsiThresholdGrid {
    pub fn baseline() -> TradeSimResult<Self> {
        Ok(Self {
            oversold: GridAxis::new("10", "45", "5")?,
            overbought: GridAxis::new("55", "95", "5")?,
        })
    }

    /// Range is `[start, end)`.
    pub fn with_oversold(self, axis: GridAxis) -> Self {
        Self {
            oversold: axis,
            ..self
        }
    }

    /// Range is `[start, end)`.
    pub fn with_overbought(self, axis: GridAxis) -> Self {
        Self {
            overbought: axis,
            ..self
        }
    }

    /// Enumerates every valid combination, returning its count and a parallel iterator of
    /// `(uid, agent)` pairs. Combinations with `oversold >= overbought` are skipped.
    pub fn build(self) -> (usize, impl ParallelIterator<Item = (usize, RsiThreshold)>) {
        let agents = iproduct!(self.oversold.generate(), self.overbought.generate())
            .filter_map(|(lo, hi)| RsiThreshold::new(lo, hi).ok())
            .enumerate()
            .collect::<Vec<_>>();

        (agents.len(), agents.into_par_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{domain::Quantity, record::RawBar};

    fn obs(momentum: f64, position: f64) -> Observation {
        let record = RawBar::ohlcv(1.0, 1.0, 1.0, 1.0, 0.0)
            .with_momentum(momentum)
            .resolve(0)
            .unwrap();
        Observation::from_record(&record, 1.0, Quantity(position), &ObservationScaling::default())
    }

    #[test]
    fn buys_oversold_and_sells_overbought() {
        let mut agent = RsiThreshold::new(30.0, 70.0).unwrap();

        assert_eq!(agent.act(&obs(25.0, 0.0)).unwrap(), Action::Buy);
        assert_eq!(agent.act(&obs(25.0, 3.0)).unwrap(), Action::Hold);
        assert_eq!(agent.act(&obs(50.0, 3.0)).unwrap(), Action::Hold);
        assert_eq!(agent.act(&obs(75.0, 3.0)).unwrap(), Action::Sell);
        assert_eq!(agent.act(&obs(75.0, 0.0)).unwrap(), Action::Hold);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        assert!(RsiThreshold::new(70.0, 30.0).is_err());
        assert!(RsiThreshold::new(-1.0, 30.0).is_err());
    }

    #[test]
    fn grid_skips_invalid_combinations() {
        let grid = RsiThresholdGrid::baseline()
            .unwrap()
            .with_oversold(GridAxis::new("40", "70", "10").unwrap())
            .with_overbought(GridAxis::new("50", "70", "10").unwrap());

        // (40,50) (40,60) (50,60); (50,50) (60,50) (60,60) are invalid.
        let (count, agents) = grid.build();
        let mut uids = agents.map(|(uid, _)| uid).collect::<Vec<_>>();
        uids.sort_unstable();

        assert_eq!(count, 3);
        assert_eq!(uids, vec![0, 1, 2]);
    }
}
