use crate::{
    error::TradeSimResult,
    gym::{
        Simulator,
        trading::{
            action::{Action, InvalidActionPolicy},
            env::Environment,
            observation::Observation,
            types::StepInfo,
        },
    },
};

use strum::EnumCount;

/// A transition in the flat shape training frameworks consume.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransition {
    pub observation: Vec<f32>,
    pub reward: f64,
    pub done: bool,
    pub info: Option<StepInfo>,
}

/// The discrete-action environment interface of reinforcement learning frameworks.
pub trait DiscreteEnv {
    fn reset(&mut self) -> Vec<f32>;

    /// # Errors
    ///
    /// Fails with an invalid action error for integers outside the action space, unless the
    /// adapter was configured to coerce them.
    fn step(&mut self, action: i64) -> TradeSimResult<RawTransition>;

    fn observation_dim(&self) -> usize;

    fn action_count(&self) -> usize;
}

/// Exposes any [`Simulator`] through [`DiscreteEnv`].
#[derive(Debug, Clone)]
pub struct GymAdapter<S> {
    inner: S,
    policy: InvalidActionPolicy,
}

impl<S: Simulator> GymAdapter<S> {
    pub fn new(inner: S, policy: InvalidActionPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> InvalidActionPolicy {
        self.policy
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl GymAdapter<Environment> {
    /// Wraps `env` with the invalid-action policy of its own configuration.
    pub fn from_environment(env: Environment) -> Self {
        let policy = env.config().invalid_action_policy();
        Self::new(env, policy)
    }
}

impl<S: Simulator> DiscreteEnv for GymAdapter<S> {
    fn reset(&mut self) -> Vec<f32> {
        self.inner.reset().into()
    }

    fn step(&mut self, action: i64) -> TradeSimResult<RawTransition> {
        let action = self.policy.resolve(action)?;
        let transition = self.inner.step(action);

        Ok(RawTransition {
            observation: transition.observation.into(),
            reward: transition.reward.0,
            done: transition.done,
            info: transition.info,
        })
    }

    fn observation_dim(&self) -> usize {
        Observation::DIM
    }

    fn action_count(&self) -> usize {
        Action::COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{feed::MarketFeed, record::RawBar},
        error::{EnvError, TradeSimError},
        gym::trading::config::EnvConfig,
    };

    fn adapter(policy: InvalidActionPolicy) -> GymAdapter<Environment> {
        let feed = MarketFeed::from_raw(
            [100.0, 110.0, 90.0].map(|c| RawBar::ohlcv(c, c, c, c, 1_000_000.0)),
        )
        .unwrap();
        let env = Environment::new(feed, EnvConfig::default().with_invalid_action_policy(policy)).unwrap();
        GymAdapter::from_environment(env)
    }

    #[test]
    fn shapes() {
        let mut gym = adapter(InvalidActionPolicy::Reject);

        assert_eq!(gym.reset().len(), gym.observation_dim());
        assert_eq!(gym.observation_dim(), 8);
        assert_eq!(gym.action_count(), 3);
    }

    #[test]
    fn reject_policy_fails_without_stepping() {
        let mut gym = adapter(InvalidActionPolicy::Reject);
        gym.reset();

        let err = gym.step(5).unwrap_err();
        assert!(matches!(err, TradeSimError::Env(EnvError::InvalidAction(5))));
        assert_eq!(gym.inner().episode_state().cursor(), 0);
    }

    #[test]
    fn hold_policy_steps_as_hold() {
        let mut gym = adapter(InvalidActionPolicy::TreatAsHold);
        gym.reset();

        let t = gym.step(-4).unwrap();
        assert_eq!(t.reward, 0.0);
        assert!(!t.done);
        assert!(gym.inner().trade_log().is_empty());
        assert_eq!(gym.inner().episode_state().cursor(), 1);
    }

    #[test]
    fn valid_actions_pass_through() {
        let mut gym = adapter(InvalidActionPolicy::Reject);
        gym.reset();

        gym.step(1).unwrap();
        let t = gym.step(2).unwrap();
        assert!((t.reward - 0.10).abs() < 1e-9);
        assert!(t.done);
        assert_eq!(t.info.unwrap().cash_balance, 1100.0);
    }
}
