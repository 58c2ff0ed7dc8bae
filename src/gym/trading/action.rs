use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::error::{EnvError, TradeSimError, TradeSimResult};

// ================================================================================================
// The Action Enum
// ================================================================================================

/// Discrete trading instruction for a single step.
///
/// The integer encoding (`0`, `1`, `2`) is the one learning frameworks use for a discrete
/// action space of size three.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    PartialOrd,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    EnumCount,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Leave the account untouched.
    #[default]
    Hold = 0,

    /// Spend as much cash as whole units allow at the current close.
    Buy = 1,

    /// Liquidate the full position at the current close.
    Sell = 2,
}

impl Action {
    pub fn index(&self) -> i64 {
        *self as i64
    }
}

impl TryFrom<i64> for Action {
    type Error = TradeSimError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Hold),
            1 => Ok(Action::Buy),
            2 => Ok(Action::Sell),
            other => Err(EnvError::InvalidAction(other).into()),
        }
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> Self {
        action.index()
    }
}

// ================================================================================================
// Invalid Action Handling
// ================================================================================================

/// What to do with an integer action outside `{0, 1, 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InvalidActionPolicy {
    /// Fail the step with [`EnvError::InvalidAction`].
    #[default]
    Reject,

    /// Execute the step as [`Action::Hold`] and log a warning.
    TreatAsHold,
}

impl InvalidActionPolicy {
    /// Maps a raw integer to an [`Action`] according to this policy.
    pub fn resolve(&self, raw: i64) -> TradeSimResult<Action> {
        match (Action::try_from(raw), self) {
            (Ok(action), _) => Ok(action),
            (Err(e), InvalidActionPolicy::Reject) => Err(e),
            (Err(_), InvalidActionPolicy::TreatAsHold) => {
                tracing::warn!(raw, "Invalid action coerced to hold");
                Ok(Action::Hold)
            }
        }
    }
}
