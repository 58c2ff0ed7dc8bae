use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A trait for incremental indicators.
/// Designed to be object-safe so producers can hold `Box<dyn StreamingIndicator>`.
pub trait StreamingIndicator: std::fmt::Debug + Send + Sync {
    /// Update the indicator with the latest scalar value (e.g., close price).
    /// Returns `Some(value)` if the indicator is warm (enough data seen), otherwise `None`.
    fn update(&mut self, value: f64) -> Option<f64>;

    /// Reset the internal state to clear history.
    fn reset(&mut self);
}

// ================================================================================================
// SMA: Simple Moving Average
// ================================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingSma {
    window_size: usize,
    buffer: VecDeque<f64>,
    sum: f64,
}

impl StreamingSma {
    pub fn new(window_size: u16) -> Self {
        let size = window_size as usize;
        Self {
            window_size: size,
            buffer: VecDeque::with_capacity(size),
            sum: 0.0,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl StreamingIndicator for StreamingSma {
    fn update(&mut self, value: f64) -> Option<f64> {
        self.buffer.push_back(value);
        self.sum += value;

        if self.buffer.len() > self.window_size
            && let Some(removed) = self.buffer.pop_front()
        {
            self.sum -= removed;
        }

        if self.buffer.len() >= self.window_size {
            Some(self.sum / self.buffer.len() as f64)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.sum = 0.0;
    }
}

// ================================================================================================
// RSI: Relative Strength Index
// ================================================================================================

/// RSI over simple rolling means of gains and losses (Cutler's variant).
///
/// The first value only seeds the previous price, so the indicator warms up after
/// `window_size + 1` updates. A window without losses reads 100, a flat window reads 50.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingRsi {
    prev_price: Option<f64>,
    avg_gain: StreamingSma,
    avg_loss: StreamingSma,
}

impl StreamingRsi {
    pub fn new(window_size: u16) -> Self {
        Self {
            prev_price: None,
            avg_gain: StreamingSma::new(window_size),
            avg_loss: StreamingSma::new(window_size),
        }
    }
}

impl StreamingIndicator for StreamingRsi {
    fn update(&mut self, value: f64) -> Option<f64> {
        let prev = self.prev_price.replace(value)?;

        let delta = value - prev;
        let (gain, loss) = if delta > 0.0 {
            (delta, 0.0)
        } else {
            (0.0, -delta)
        };

        let g_val = self.avg_gain.update(gain);
        let l_val = self.avg_loss.update(loss);

        match (g_val, l_val) {
            (Some(avg_gain), Some(avg_loss)) => {
                if avg_loss == 0.0 {
                    if avg_gain == 0.0 { Some(50.0) } else { Some(100.0) }
                } else {
                    let rs = avg_gain / avg_loss;
                    Some(100.0 - (100.0 / (1.0 + rs)))
                }
            }
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.prev_price = None;
        self.avg_gain.reset();
        self.avg_loss.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sma_warms_up_after_window() {
        let mut sma = StreamingSma::new(3);

        assert_eq!(sma.update(1.0), None);
        assert_eq!(sma.update(2.0), None);
        assert_eq!(sma.update(3.0), Some(2.0));
        // Window slides: (2 + 3 + 7) / 3
        assert_eq!(sma.update(7.0), Some(4.0));
    }

    #[test]
    fn sma_reset_clears_history() {
        let mut sma = StreamingSma::new(2);
        sma.update(10.0);
        sma.update(20.0);
        sma.reset();

        assert_eq!(sma.update(5.0), None);
        assert_eq!(sma.update(7.0), Some(6.0));
    }

    #[test]
    fn rsi_needs_window_plus_one_values() {
        let mut rsi = StreamingRsi::new(2);

        assert_eq!(rsi.update(10.0), None);
        assert_eq!(rsi.update(11.0), None);
        assert!(rsi.update(12.0).is_some());
    }

    #[test]
    fn rsi_mixed_moves() {
        let mut rsi = StreamingRsi::new(2);
        rsi.update(10.0);
        rsi.update(12.0); // gain 2
        let value = rsi.update(11.0).unwrap(); // loss 1

        // avg gain 1.0, avg loss 0.5 -> rs 2 -> 100 - 100/3
        assert!(approx(value, 100.0 - 100.0 / 3.0));
    }

    #[test]
    fn rsi_edge_readings() {
        let mut up = StreamingRsi::new(2);
        [1.0, 2.0, 3.0].iter().for_each(|v| {
            up.update(*v);
        });
        assert_eq!(up.update(4.0), Some(100.0));

        let mut flat = StreamingRsi::new(2);
        flat.update(5.0);
        flat.update(5.0);
        assert_eq!(flat.update(5.0), Some(50.0));
    }
}
