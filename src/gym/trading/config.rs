// ================================================================================================
// Domain Strong Types (NewTypes)
// ================================================================================================

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{EnvError, IoError, TradeSimResult},
    gym::trading::action::InvalidActionPolicy,
};

/// Drawdown fraction above which the step reward is penalized.
///
/// The comparison is strict: a drawdown of exactly the threshold carries no penalty.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DrawdownThreshold(pub f64);

impl Default for DrawdownThreshold {
    fn default() -> Self {
        Self(0.10)
    }
}

impl DrawdownThreshold {
    pub fn is_exceeded_by(&self, drawdown: f64) -> bool {
        drawdown > self.0
    }
}

/// Divisors applied to the non-price observation features.
///
/// Price features are always divided by the feed's anchor close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationScaling {
    pub volume: f64,
    pub momentum: f64,
    pub position: f64,
}

impl Default for ObservationScaling {
    fn default() -> Self {
        Self {
            volume: 1_000_000.0,
            momentum: 100.0,
            position: 10.0,
        }
    }
}

// ================================================================================================
// Environment Configuration
// ================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Cash the account starts every episode with. Must be finite and > 0.
    initial_cash: f64,

    drawdown_threshold: DrawdownThreshold,

    observation_scaling: ObservationScaling,

    /// Applied by the framework adapter to raw integer actions.
    invalid_action_policy: InvalidActionPolicy,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            initial_cash: 1000.0,
            drawdown_threshold: DrawdownThreshold::default(),
            observation_scaling: ObservationScaling::default(),
            invalid_action_policy: InvalidActionPolicy::default(),
        }
    }
}

// ================================================================================================
// Builder Methods
// ================================================================================================

impl EnvConfig {
    pub fn with_initial_cash(self, initial_cash: f64) -> Self {
        Self {
            initial_cash,
            ..self
        }
    }

    pub fn with_drawdown_threshold(self, drawdown_threshold: DrawdownThreshold) -> Self {
        Self {
            drawdown_threshold,
            ..self
        }
    }

    pub fn with_observation_scaling(self, observation_scaling: ObservationScaling) -> Self {
        Self {
            observation_scaling,
            ..self
        }
    }

    pub fn with_invalid_action_policy(self, invalid_action_policy: InvalidActionPolicy) -> Self {
        Self {
            invalid_action_policy,
            ..self
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> TradeSimResult<Self> {
        let file = File::open(path.as_ref()).map_err(IoError::from)?;
        let cfg: Self = serde_json::from_reader(BufReader::new(file)).map_err(IoError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TradeSimResult<()> {
        if !(self.initial_cash.is_finite() && self.initial_cash > 0.0) {
            return Err(EnvError::Configuration(format!(
                "initial cash must be finite and positive, got {}",
                self.initial_cash
            ))
            .into());
        }

        let threshold = self.drawdown_threshold.0;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(EnvError::Configuration(format!(
                "drawdown threshold must be finite and non-negative, got {threshold}"
            ))
            .into());
        }

        let s = self.observation_scaling;
        if [s.volume, s.momentum, s.position]
            .iter()
            .any(|d| !(d.is_finite() && *d > 0.0))
        {
            return Err(EnvError::Configuration(
                "observation scaling divisors must be finite and positive".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

// ================================================================================================
// Accessor Methods
// ================================================================================================

impl EnvConfig {
    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn drawdown_threshold(&self) -> DrawdownThreshold {
        self.drawdown_threshold
    }

    pub fn observation_scaling(&self) -> ObservationScaling {
        self.observation_scaling
    }

    pub fn invalid_action_policy(&self) -> InvalidActionPolicy {
        self.invalid_action_policy
    }
}
