use std::{fs, ops::Index, path::Path, sync::Arc};

use crate::{
    data::{
        domain::Price,
        record::{MarketRecord, RawBar},
    },
    error::{DataError, EnvError, IoError, TradeSimResult},
};

/// An ordered, immutable, non-empty sequence of [`MarketRecord`]s.
///
/// The feed is shared behind an `Arc`, so cloning an environment for a parallel worker does
/// not copy the market data.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketFeed {
    records: Arc<[MarketRecord]>,
}

impl MarketFeed {
    /// Builds a feed from fully resolved records.
    ///
    /// # Errors
    /// Returns [`EnvError::Configuration`] if `records` is empty.
    pub fn new(records: Vec<MarketRecord>) -> TradeSimResult<Self> {
        if records.is_empty() {
            return Err(EnvError::Configuration("market feed must not be empty".to_string()).into());
        }
        Ok(Self {
            records: records.into(),
        })
    }

    /// Builds a feed from raw bars, resolving indicator defaults once per bar.
    pub fn from_raw(bars: impl IntoIterator<Item = RawBar>) -> TradeSimResult<Self> {
        let records = bars
            .into_iter()
            .enumerate()
            .map(|(index, bar)| bar.resolve(index))
            .collect::<TradeSimResult<Vec<_>>>()?;
        Self::new(records)
    }

    /// Parses a JSON array of bars.
    pub fn from_json_str(json: &str) -> TradeSimResult<Self> {
        let bars: Vec<RawBar> = serde_json::from_str(json).map_err(DataError::from)?;
        Self::from_raw(bars)
    }

    /// Reads a JSON array of bars from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> TradeSimResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(IoError::from)?;
        let feed = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), records = feed.len(), "Market feed loaded");
        Ok(feed)
    }

    /// Writes the feed as a JSON array of bars.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> TradeSimResult<()> {
        let bars = self.records.iter().copied().map(RawBar::from).collect::<Vec<_>>();
        let json = serde_json::to_string_pretty(&bars).map_err(IoError::from)?;
        fs::write(path, json).map_err(IoError::from)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MarketRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketRecord> {
        self.records.iter()
    }

    /// Close of the first record, the normalization anchor for a whole episode.
    pub fn anchor_close(&self) -> Price {
        self.records[0].close
    }

    /// Index of the last record an action can still be priced on.
    pub fn last_index(&self) -> usize {
        self.records.len() - 1
    }
}

impl Index<usize> for MarketFeed {
    type Output = MarketRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl TryFrom<Vec<MarketRecord>> for MarketFeed {
    type Error = crate::error::TradeSimError;

    fn try_from(records: Vec<MarketRecord>) -> Result<Self, Self::Error> {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TradeSimError;

    fn closes(values: &[f64]) -> Vec<RawBar> {
        values
            .iter()
            .map(|&c| RawBar::ohlcv(c, c, c, c, 1_000.0))
            .collect()
    }

    #[test]
    fn empty_feed_is_a_configuration_error() {
        let err = MarketFeed::from_raw(Vec::<RawBar>::new()).unwrap_err();
        assert!(matches!(err, TradeSimError::Env(EnvError::Configuration(_))));
    }

    #[test]
    fn anchor_is_the_first_close() {
        let feed = MarketFeed::from_raw(closes(&[100.0, 110.0, 90.0])).unwrap();

        assert_eq!(feed.len(), 3);
        assert_eq!(feed.last_index(), 2);
        assert_eq!(feed.anchor_close(), Price(100.0));
        assert_eq!(feed[2].close, Price(90.0));
    }

    #[test]
    fn invalid_bar_reports_its_position() {
        let mut bars = closes(&[100.0, 110.0]);
        bars[1].close = -1.0;

        let err = MarketFeed::from_raw(bars).unwrap_err();
        assert!(matches!(
            err,
            TradeSimError::Data(DataError::InvalidRecord { index: 1, .. })
        ));
    }

    #[test]
    fn json_feed_resolves_defaults() {
        let json = r#"[
            {"timestamp":"2024-01-01T00:00:00Z","open":100,"high":101,"low":99,"close":100,"volume":2000000},
            {"open":100,"high":112,"low":100,"close":110,"volume":1000000,"sma_20":105,"rsi":64}
        ]"#;
        let feed = MarketFeed::from_json_str(json).unwrap();

        assert!(feed[0].timestamp.is_some());
        assert_eq!(feed[0].moving_average, Price(100.0));
        assert_eq!(feed[0].momentum.0, 50.0);
        assert_eq!(feed[1].moving_average, Price(105.0));
        assert_eq!(feed[1].momentum.0, 64.0);
    }

    #[test]
    fn malformed_json_is_a_data_error() {
        let err = MarketFeed::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TradeSimError::Data(DataError::FeedParse(_))));
    }
}
