use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{impl_display_primitive, impl_float_arithmetic, impl_from_primitive};

// ================================================================================================
// Domain Strong Types (NewTypes)
// ================================================================================================

/// Represents a price level in the quote currency.
///
/// Used for: Open, High, Low, Close, moving averages and execution prices.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Price(pub f64);
impl_from_primitive!(Price, f64);
impl_float_arithmetic!(Price);
impl_display_primitive!(Price);

/// Represents an amount of the **Base Asset**.
///
/// This is the unit for position sizes, fills and market volume. The simulator only ever
/// fills whole units, but the type stays `f64` so that volume and normalization arithmetic
/// need no conversions.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Quantity(pub f64);
impl_from_primitive!(Quantity, f64);
impl_float_arithmetic!(Quantity);
impl_display_primitive!(Quantity);

impl Quantity {
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Quote-currency value of this quantity at `price`.
    pub fn notional(&self, price: Price) -> f64 {
        self.0 * price.0
    }
}

/// Semantic alias for `Quantity` when referring to aggregated market activity.
pub type Volume = Quantity;

/// Represents a momentum oscillator reading on the `[0, 100]` scale (e.g. RSI).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Momentum(pub f64);
impl_from_primitive!(Momentum, f64);
impl_display_primitive!(Momentum);

impl Momentum {
    /// Neutral reading used when a feed carries no oscillator.
    pub const NEUTRAL: Momentum = Momentum(50.0);

    pub fn is_in_range(&self) -> bool {
        (0.0..=100.0).contains(&self.0)
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Side of an executed fill.
///
/// Serialized in upper case (`"BUY"`, `"SELL"`) to match the trade log format consumed by
/// result sinks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}
