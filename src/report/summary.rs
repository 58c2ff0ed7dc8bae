use serde::{Deserialize, Serialize};

use crate::{
    data::domain::Quantity,
    gym::trading::{ledger::TradeLog, state::EpisodeState},
};

/// End-of-episode result handed to the result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub initial_cash: f64,

    /// `100 × (final_net_worth − initial_cash) / initial_cash`.
    pub total_return_pct: f64,

    pub final_cash_balance: f64,
    pub final_position_size: Quantity,
    pub final_net_worth: f64,
    pub trade_count: usize,
    pub trade_log: TradeLog,
}

impl BacktestSummary {
    pub fn new(initial_cash: f64, state: &EpisodeState) -> Self {
        Self {
            initial_cash,
            total_return_pct: 100.0 * (state.net_worth() - initial_cash) / initial_cash,
            final_cash_balance: state.cash_balance(),
            final_position_size: state.position_size(),
            final_net_worth: state.net_worth(),
            trade_count: state.trade_log().len(),
            trade_log: state.trade_log().clone(),
        }
    }
}
