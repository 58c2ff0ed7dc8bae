use serde::{Deserialize, Serialize};

use crate::data::domain::{Price, Quantity, TradeSide};

/// A single fill executed by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Cursor position the fill was priced at.
    pub step_index: usize,
    pub side: TradeSide,
    pub price: Price,
    pub quantity: Quantity,
}

impl TradeRecord {
    pub fn notional(&self) -> f64 {
        self.quantity.notional(self.price)
    }
}

/// A completed BUY followed by the SELL that closed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    pub entry: TradeRecord,
    pub exit: TradeRecord,
}

impl RoundTrip {
    /// Fractional price return of the trip, `(exit - entry) / entry`.
    pub fn return_fraction(&self) -> f64 {
        (self.exit.price.0 - self.entry.price.0) / self.entry.price.0
    }
}

/// The authoritative, append-only record of all fills within an episode.
///
/// Only the episode state appends to it; everything else gets read access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeLog(Vec<TradeRecord>);

impl TradeLog {
    pub(super) fn push(&mut self, record: TradeRecord) {
        self.0.push(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[TradeRecord] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradeRecord> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&TradeRecord> {
        self.0.last()
    }

    /// Pairs consecutive records into BUY→SELL round trips.
    ///
    /// The log walks in steps of two, so a trailing open BUY (position still held) is not a
    /// round trip. Since the environment only ever buys when flat and always sells the full
    /// position, every even-indexed record is a BUY and every odd one a SELL.
    pub fn round_trips(&self) -> Vec<RoundTrip> {
        self.0
            .chunks_exact(2)
            .filter_map(|pair| match (pair[0].side, pair[1].side) {
                (TradeSide::Buy, TradeSide::Sell) => Some(RoundTrip {
                    entry: pair[0],
                    exit: pair[1],
                }),
                _ => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a TradeLog {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
