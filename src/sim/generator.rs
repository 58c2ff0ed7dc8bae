use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::{
    data::{
        feed::MarketFeed,
        indicator::{IndicatorConfig, attach_indicators},
        record::RawBar,
    },
    error::{EnvError, TradeSimResult},
};

/// Lowest close the random walk may reach.
const PRICE_FLOOR: f64 = 1.0;

/// Parameters of the synthetic random-walk feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed of the generator-owned RNG. Equal seeds produce identical feeds.
    pub seed: u64,

    /// Number of bars to produce.
    pub n_steps: usize,

    /// Close of the first bar.
    pub base_price: f64,

    /// Standard deviation of the per-bar close return.
    pub volatility: f64,

    /// Constant per-bar return added on top of the noise.
    pub drift: f64,

    /// Standard deviation of the high/low excursion around the close.
    pub intrabar_volatility: f64,

    /// Volume is drawn uniformly from `[min_volume, max_volume)`.
    pub min_volume: f64,
    pub max_volume: f64,

    pub indicators: IndicatorConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_steps: 1000,
            base_price: 50_000.0,
            volatility: 0.02,
            drift: 0.0001,
            intrabar_volatility: 0.01,
            min_volume: 1e6,
            max_volume: 1e8,
            indicators: IndicatorConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_n_steps(self, n_steps: usize) -> Self {
        Self { n_steps, ..self }
    }

    pub fn with_base_price(self, base_price: f64) -> Self {
        Self { base_price, ..self }
    }

    pub fn with_indicators(self, indicators: IndicatorConfig) -> Self {
        Self { indicators, ..self }
    }

    pub fn validate(&self) -> TradeSimResult<()> {
        let invalid = |msg: &str| -> TradeSimResult<()> {
            Err(EnvError::Configuration(msg.to_string()).into())
        };

        if self.n_steps == 0 {
            return invalid("generator must produce at least one bar");
        }
        if !self.base_price.is_finite() || self.base_price < PRICE_FLOOR {
            return invalid("base price must be finite and at least 1");
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0)
            || !(self.intrabar_volatility.is_finite() && self.intrabar_volatility >= 0.0)
        {
            return invalid("volatilities must be finite and non-negative");
        }
        if !self.drift.is_finite() {
            return invalid("drift must be finite");
        }
        if !(self.min_volume >= 0.0 && self.min_volume < self.max_volume && self.max_volume.is_finite()) {
            return invalid("volume range must satisfy 0 <= min < max");
        }
        self.indicators.validate()
    }
}

/// Random-walk OHLCV generator with an explicitly owned RNG.
///
/// Every generator seeds its own [`StdRng`]; nothing touches process-wide randomness, so
/// generators can run on parallel workers and still reproduce their fixtures.
#[derive(Debug, Clone)]
pub struct FeedGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl FeedGenerator {
    pub fn new(config: GeneratorConfig) -> TradeSimResult<Self> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produces the raw bars with indicators attached.
    ///
    /// Successive calls continue the RNG stream; build a new generator to replay a seed.
    #[tracing::instrument(skip(self), fields(seed = self.config.seed, n_steps = self.config.n_steps))]
    pub fn generate_bars(&mut self) -> TradeSimResult<Vec<RawBar>> {
        let cfg = self.config;
        let returns = normal(0.0, cfg.volatility)?;
        let excursion = normal(0.0, cfg.intrabar_volatility)?;

        let mut closes = Vec::with_capacity(cfg.n_steps);
        closes.push(cfg.base_price);
        for _ in 1..cfg.n_steps {
            let prev = closes[closes.len() - 1];
            let change = returns.sample(&mut self.rng) + cfg.drift;
            closes.push((prev * (1.0 + change)).max(PRICE_FLOOR));
        }

        let mut bars = closes
            .into_iter()
            .map(|close| {
                let high = close * (1.0 + excursion.sample(&mut self.rng).abs());
                // Keep the low strictly positive even for extreme draws.
                let low = (close * (1.0 - excursion.sample(&mut self.rng).abs())).max(f64::MIN_POSITIVE);
                let open = low + (high - low) * self.rng.random::<f64>();
                let volume = self.rng.random_range(cfg.min_volume..cfg.max_volume);
                RawBar::ohlcv(open, high, low, close, volume)
            })
            .collect::<Vec<_>>();

        attach_indicators(&mut bars, &cfg.indicators)?;
        tracing::debug!(bars = bars.len(), "Synthetic bars generated");
        Ok(bars)
    }

    /// Produces a fully resolved [`MarketFeed`].
    pub fn generate(&mut self) -> TradeSimResult<MarketFeed> {
        MarketFeed::from_raw(self.generate_bars()?)
    }
}

fn normal(mean: f64, std_dev: f64) -> TradeSimResult<Normal<f64>> {
    Normal::new(mean, std_dev)
        .map_err(|e| EnvError::Configuration(format!("invalid normal distribution: {e}")).into())
}
