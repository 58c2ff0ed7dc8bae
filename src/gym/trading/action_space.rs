use rand::Rng;
use strum::{EnumCount, IntoEnumIterator};

use crate::gym::trading::action::Action;

/// The discrete action space `{hold, buy, sell}`.
///
/// Sampling draws from a caller-owned RNG so exploration stays reproducible per episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSpace;

impl ActionSpace {
    pub fn n(&self) -> usize {
        Action::COUNT
    }

    pub fn contains(&self, raw: i64) -> bool {
        Action::try_from(raw).is_ok()
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> {
        Action::iter()
    }

    /// Draws one action uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        match rng.random_range(0..Action::COUNT) {
            0 => Action::Hold,
            1 => Action::Buy,
            _ => Action::Sell,
        }
    }
}
