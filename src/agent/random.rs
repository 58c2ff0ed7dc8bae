use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::{
    agent::{Agent, AgentIdentifier},
    error::TradeSimResult,
    gym::trading::{action::Action, action_space::ActionSpace, observation::Observation},
};

/// Uniform exploration over the action space.
///
/// The RNG is reseeded on every `reset`, so the same seed replays the same action sequence
/// episode after episode.
#[derive(Debug, Clone, Serialize)]
pub struct RandomAgent {
    seed: u64,
    #[serde(skip)]
    rng: StdRng,
    #[serde(skip)]
    space: ActionSpace,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            space: ActionSpace,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _obs: &Observation) -> TradeSimResult<Action> {
        Ok(self.space.sample(&mut self.rng))
    }

    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::Random
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}
