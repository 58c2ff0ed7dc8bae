use serde::Serialize;

use crate::{
    agent::{Agent, AgentIdentifier},
    error::TradeSimResult,
    gym::trading::{action::Action, observation::Observation},
};

/// Buys on the first step and holds until the episode ends.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BuyAndHold {
    #[serde(skip)]
    entered: bool,
}

impl BuyAndHold {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Agent for BuyAndHold {
    fn act(&mut self, _obs: &Observation) -> TradeSimResult<Action> {
        if self.entered {
            return Ok(Action::Hold);
        }
        self.entered = true;
        Ok(Action::Buy)
    }

    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::BuyAndHold
    }

    fn reset(&mut self) {
        self.entered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buys_once_then_holds() {
        let mut agent = BuyAndHold::new();
        let obs = Observation::zeros();

        assert_eq!(agent.act(&obs).unwrap(), Action::Buy);
        assert_eq!(agent.act(&obs).unwrap(), Action::Hold);

        agent.reset();
        assert_eq!(agent.act(&obs).unwrap(), Action::Buy);
    }
}
