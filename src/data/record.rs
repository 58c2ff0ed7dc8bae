use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    data::domain::{Momentum, Price, Volume},
    error::{DataError, TradeSimResult},
};

/// A bar as delivered by a feed producer, before indicator defaults are resolved.
///
/// Indicator fields are optional here. They accept the column names historical exports
/// commonly use (`sma_20`, `rsi`) in addition to the canonical names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, alias = "sma_20", alias = "sma")]
    pub moving_average: Option<f64>,
    #[serde(default, alias = "rsi")]
    pub momentum: Option<f64>,
}

impl RawBar {
    /// Bar without indicators.
    pub fn ohlcv(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp: None,
            open,
            high,
            low,
            close,
            volume,
            moving_average: None,
            momentum: None,
        }
    }

    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..self
        }
    }

    pub fn with_moving_average(self, moving_average: f64) -> Self {
        Self {
            moving_average: Some(moving_average),
            ..self
        }
    }

    pub fn with_momentum(self, momentum: f64) -> Self {
        Self {
            momentum: Some(momentum),
            ..self
        }
    }

    /// Resolves indicator defaults and validates the bar.
    ///
    /// A missing moving average defaults to the bar's close, a missing momentum reading to
    /// the neutral 50. `index` is only used for error reporting.
    pub fn resolve(self, index: usize) -> TradeSimResult<MarketRecord> {
        let invalid = |msg: String| DataError::InvalidRecord { index, msg };

        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be a positive finite price, got {value}")).into());
            }
        }

        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(invalid(format!(
                "volume must be non-negative and finite, got {}",
                self.volume
            ))
            .into());
        }

        let moving_average = self.moving_average.unwrap_or(self.close);
        if !moving_average.is_finite() {
            return Err(invalid(format!("moving average must be finite, got {moving_average}")).into());
        }

        let momentum = self.momentum.map(Momentum).unwrap_or(Momentum::NEUTRAL);
        if !momentum.is_in_range() {
            return Err(invalid(format!("momentum must lie in [0, 100], got {momentum}")).into());
        }

        Ok(MarketRecord {
            timestamp: self.timestamp,
            open: Price(self.open),
            high: Price(self.high),
            low: Price(self.low),
            close: Price(self.close),
            volume: Volume::from(self.volume),
            moving_average: Price(moving_average),
            momentum,
        })
    }
}

/// One period of the market feed with every indicator resolved.
///
/// Records are immutable once part of a [`MarketFeed`](crate::data::feed::MarketFeed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
    pub moving_average: Price,
    pub momentum: Momentum,
}

impl From<MarketRecord> for RawBar {
    fn from(record: MarketRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            open: record.open.0,
            high: record.high.0,
            low: record.low.0,
            close: record.close.0,
            volume: record.volume.0,
            moving_average: Some(record.moving_average.0),
            momentum: Some(record.momentum.0),
        }
    }
}
