use serde::{Deserialize, Serialize};

use crate::{
    gym::trading::{action::Action, observation::Observation, types::StepInfo},
    impl_display_primitive, impl_float_arithmetic, impl_from_primitive,
};

pub mod adapter;
pub mod trading;

/// Represents the reward signal returned by a single step.
///
/// The trading environment rewards the cumulative return of the account to date, minus a
/// drawdown penalty once the drawdown from the running peak exceeds the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Reward(pub f64);
impl_from_primitive!(Reward, f64);
impl_float_arithmetic!(Reward);
impl_display_primitive!(Reward);

impl Reward {
    pub const ZERO: Reward = Reward(0.0);
}

/// Represents the lifecycle status of an episode.
///
/// # Lifecycle
///
/// ```md
/// Current State | Call    | Next State | Notes
/// --------------|---------|------------|------------------------------------------------
/// `Active`      | step()  | `Active`   | Cursor advanced, boundary not reached
/// `Active`      | step()  | `Terminal` | Advance reached the last usable record
/// `Terminal`    | step()  | `Terminal` | No-op, reward 0, no state change
/// any           | reset() | `Active`*  | Fresh episode state
/// ```
///
/// *A single-record feed is `Terminal` right after `reset()`: there is no next record to
/// advance onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvStatus {
    /// The cursor sits before the last usable record; `step()` executes actions.
    Active,

    /// The cursor reached the last usable record; `step()` is a no-op.
    Terminal,
}

impl EnvStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// Everything a single `step()` hands back to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub reward: Reward,
    pub done: bool,
    /// Diagnostic account snapshot. `None` for the terminal no-op step.
    pub info: Option<StepInfo>,
}

impl Transition {
    /// The tuple returned when stepping an episode that already ended.
    pub fn terminal(observation: Observation) -> Self {
        Self {
            observation,
            reward: Reward::ZERO,
            done: true,
            info: None,
        }
    }
}

/// The plain capability set of an episodic simulator.
///
/// Training frameworks do not talk to this trait directly; they go through
/// [`adapter::GymAdapter`], which keeps any framework-facing conventions (raw integer actions,
/// flat observation buffers) out of the simulator itself.
pub trait Simulator {
    /// Starts a fresh episode and returns its first observation.
    fn reset(&mut self) -> Observation;

    /// Observation for the current cursor position without mutating anything.
    fn observe(&self) -> Observation;

    /// Executes `action` at the current record and advances the episode.
    fn step(&mut self, action: Action) -> Transition;

    fn status(&self) -> EnvStatus;
}
