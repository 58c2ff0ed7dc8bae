use serde::{Deserialize, Serialize};

use crate::{
    data::record::RawBar,
    error::{DataError, TradeSimResult},
    math::indicator::{StreamingIndicator, StreamingRsi, StreamingSma},
};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SmaWindow(pub u16);

impl Default for SmaWindow {
    fn default() -> Self {
        Self(20)
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RsiWindow(pub u16);

impl Default for RsiWindow {
    fn default() -> Self {
        Self(14)
    }
}

/// Lookback windows for the indicators attached to a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub sma: SmaWindow,
    pub rsi: RsiWindow,
}

impl IndicatorConfig {
    pub fn validate(&self) -> TradeSimResult<()> {
        if self.sma.0 == 0 {
            return Err(DataError::InvalidWindow("SMA window must be at least 1".to_string()).into());
        }
        if self.rsi.0 == 0 {
            return Err(DataError::InvalidWindow("RSI window must be at least 1".to_string()).into());
        }
        Ok(())
    }
}

impl SmaWindow {
    /// Rolling mean of `values`; `None` until the window is full.
    pub fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        run(StreamingSma::new(self.0), values)
    }
}

impl RsiWindow {
    /// Rolling RSI of `values`; `None` until `window + 1` values were seen.
    pub fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        run(StreamingRsi::new(self.0), values)
    }
}

/// Computes SMA and RSI over the bar closes and stores them on the bars.
///
/// Leading values the lookback cannot resolve are backfilled with the first resolved value.
/// If the feed is shorter than a lookback the field stays `None`, and the record defaults apply
/// when the bars are resolved into a feed.
pub fn attach_indicators(bars: &mut [RawBar], cfg: &IndicatorConfig) -> TradeSimResult<()> {
    cfg.validate()?;

    let closes = bars.iter().map(|bar| bar.close).collect::<Vec<_>>();
    let sma = backfill(cfg.sma.compute(&closes));
    let rsi = backfill(cfg.rsi.compute(&closes));

    for ((bar, ma), momentum) in bars.iter_mut().zip(sma).zip(rsi) {
        bar.moving_average = ma;
        bar.momentum = momentum;
    }
    Ok(())
}

/// Fills leading `None`s with the first defined value, then carries values forward over any
/// later gaps.
pub fn backfill(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    let first = values.iter().flatten().copied().next();
    let Some(mut last) = first else {
        return values;
    };

    values
        .into_iter()
        .map(|value| {
            if let Some(v) = value {
                last = v;
            }
            Some(last)
        })
        .collect()
}

fn run(mut indicator: impl StreamingIndicator, values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| indicator.update(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<RawBar> {
        closes
            .iter()
            .map(|&c| RawBar::ohlcv(c, c, c, c, 1.0))
            .collect()
    }

    #[test]
    fn backfill_fills_leading_gaps() {
        let filled = backfill(vec![None, None, Some(3.0), Some(4.0)]);
        assert_eq!(filled, vec![Some(3.0), Some(3.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn backfill_carries_forward_over_later_gaps() {
        let filled = backfill(vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(filled, vec![Some(1.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn backfill_leaves_undefined_series_alone() {
        assert_eq!(backfill(vec![None, None]), vec![None, None]);
    }

    #[test]
    fn attached_indicators_have_no_gaps() {
        let mut bars = bars(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        let cfg = IndicatorConfig {
            sma: SmaWindow(3),
            rsi: RsiWindow(2),
        };
        attach_indicators(&mut bars, &cfg).unwrap();

        assert!(bars.iter().all(|b| b.moving_average.is_some() && b.momentum.is_some()));
        // First full SMA window (10 + 11 + 12) / 3 is backfilled onto the first two bars.
        assert_eq!(bars[0].moving_average, Some(11.0));
        assert_eq!(bars[2].moving_average, Some(11.0));
        assert_eq!(bars[4].moving_average, Some(12.0));
    }

    #[test]
    fn short_feed_keeps_indicators_undefined() {
        let mut bars = bars(&[10.0, 11.0]);
        attach_indicators(&mut bars, &IndicatorConfig::default()).unwrap();

        assert!(bars.iter().all(|b| b.moving_average.is_none() && b.momentum.is_none()));
    }

    #[test]
    fn zero_window_is_rejected() {
        let cfg = IndicatorConfig {
            sma: SmaWindow(0),
            rsi: RsiWindow(14),
        };
        assert!(attach_indicators(&mut bars(&[1.0]), &cfg).is_err());
    }
}
