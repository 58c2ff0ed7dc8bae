use serde::{Deserialize, Serialize};

use crate::{
    data::domain::{Price, Quantity, TradeSide},
    gym::trading::{
        ledger::{TradeLog, TradeRecord},
        types::StepInfo,
    },
};

/// Mutable account state of a single episode.
///
/// # Invariants
///
/// - `cash_balance >= 0` and `position_size >= 0` at all times.
/// - `net_worth` is re-derived from cash and position after every step.
/// - `peak_net_worth >= net_worth`.
/// - `cursor` never decreases within an episode.
///
/// Only the environment mutates it, through `step` and `reset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    cursor: usize,
    cash_balance: f64,
    position_size: Quantity,
    net_worth: f64,
    peak_net_worth: f64,
    trade_log: TradeLog,
}

impl EpisodeState {
    pub(crate) fn new(initial_cash: f64) -> Self {
        Self {
            cursor: 0,
            cash_balance: initial_cash,
            position_size: Quantity(0.0),
            net_worth: initial_cash,
            peak_net_worth: initial_cash,
            trade_log: TradeLog::default(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    pub fn position_size(&self) -> Quantity {
        self.position_size
    }

    pub fn net_worth(&self) -> f64 {
        self.net_worth
    }

    pub fn peak_net_worth(&self) -> f64 {
        self.peak_net_worth
    }

    pub fn trade_log(&self) -> &TradeLog {
        &self.trade_log
    }

    /// Fractional drop of the net worth from its running peak.
    pub fn drawdown(&self) -> f64 {
        if self.peak_net_worth > 0.0 {
            (self.peak_net_worth - self.net_worth) / self.peak_net_worth
        } else {
            0.0
        }
    }

    pub fn info(&self) -> StepInfo {
        StepInfo {
            net_worth: self.net_worth,
            cash_balance: self.cash_balance,
            position_size: self.position_size,
        }
    }
}

// ================================================================================================
// Transitions
// ================================================================================================

impl EpisodeState {
    /// Spends cash on as many whole units as it covers at `price`.
    ///
    /// Returns `None` without touching the state when the cash does not cover a single unit.
    pub(crate) fn buy(&mut self, price: Price) -> Option<TradeRecord> {
        if self.cash_balance < price.0 {
            return None;
        }

        let mut quantity = (self.cash_balance / price.0).floor();
        // Floating-point division can round up to a quantity the cash does not quite cover.
        if quantity * price.0 > self.cash_balance {
            quantity -= 1.0;
        }
        if quantity <= 0.0 {
            return None;
        }

        let quantity = Quantity(quantity);
        self.position_size += quantity;
        self.cash_balance = (self.cash_balance - quantity.notional(price)).max(0.0);
        Some(self.record(TradeSide::Buy, price, quantity))
    }

    /// Liquidates the full position at `price`. `None` when flat.
    pub(crate) fn sell(&mut self, price: Price) -> Option<TradeRecord> {
        if self.position_size.is_zero() {
            return None;
        }

        let quantity = self.position_size;
        self.cash_balance += quantity.notional(price);
        self.position_size = Quantity(0.0);
        Some(self.record(TradeSide::Sell, price, quantity))
    }

    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Re-derives net worth at `price` and lifts the running peak.
    pub(crate) fn mark_to_market(&mut self, price: Price) -> f64 {
        self.net_worth = self.cash_balance + self.position_size.notional(price);
        self.peak_net_worth = self.peak_net_worth.max(self.net_worth);
        self.net_worth
    }

    fn record(&mut self, side: TradeSide, price: Price, quantity: Quantity) -> TradeRecord {
        let record = TradeRecord {
            step_index: self.cursor,
            side,
            price,
            quantity,
        };
        self.trade_log.push(record);
        record
    }
}
