use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{gym::trading::ledger::TradeLog, report::summary::BacktestSummary};

/// Trading days per year used to annualize the Sharpe ratio.
const ANNUALIZATION_DAYS: f64 = 252.0;

/// Trade-level statistics derived from the BUY→SELL round trips of a trade log.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return_pct: f64,

    /// Mean over standard deviation of round-trip returns, annualized with `√252`.
    /// Zero without round trips. Returns without spread are scaled by a unit deviation.
    pub sharpe_ratio: f64,

    /// Largest peak-to-trough drop of the compounded round-trip balance, in percent.
    pub max_drawdown_pct: f64,

    pub win_rate_pct: f64,

    /// Number of fills in the trade log (not round trips).
    pub total_trades: usize,

    pub avg_trade_return_pct: f64,
}

impl PerformanceMetrics {
    pub fn from_summary(summary: &BacktestSummary) -> Self {
        Self::from_trade_log(summary.total_return_pct, &summary.trade_log)
    }

    pub fn from_trade_log(total_return_pct: f64, log: &TradeLog) -> Self {
        let returns = log
            .round_trips()
            .iter()
            .map(|trip| trip.return_fraction())
            .collect::<Vec<_>>();

        if returns.is_empty() {
            return Self {
                total_return_pct,
                total_trades: log.len(),
                ..Default::default()
            };
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std = if variance > 0.0 { variance.sqrt() } else { 1.0 };
        let sharpe_ratio = mean / std * ANNUALIZATION_DAYS.sqrt();

        let wins = returns.iter().filter(|&&r| r > 0.0).count();

        Self {
            total_return_pct,
            sharpe_ratio,
            max_drawdown_pct: 100.0 * max_compounded_drawdown(&returns),
            win_rate_pct: 100.0 * wins as f64 / n,
            total_trades: log.len(),
            avg_trade_return_pct: 100.0 * mean,
        }
    }
}

/// Compounds `returns` onto a unit balance and tracks the deepest drop from its running peak.
fn max_compounded_drawdown(returns: &[f64]) -> f64 {
    let (_, _, max_dd) = returns
        .iter()
        .fold((1.0_f64, 1.0_f64, 0.0_f64), |(balance, peak, max_dd), r| {
            let balance = balance * (1.0 + r);
            let peak = peak.max(balance);
            (balance, peak, max_dd.max((peak - balance) / peak))
        });
    max_dd
}

// ================================================================================================
// Ranking Metrics
// ================================================================================================

/// Metrics an agent can be ranked by on the leaderboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMetric {
    TotalReturnPct,
    SharpeRatio,
    MaxDrawdownPct,
    WinRatePct,
}

impl PerformanceMetric {
    pub fn value(&self, summary: &BacktestSummary, metrics: &PerformanceMetrics) -> f64 {
        match self {
            Self::TotalReturnPct => summary.total_return_pct,
            Self::SharpeRatio => metrics.sharpe_ratio,
            Self::MaxDrawdownPct => metrics.max_drawdown_pct,
            Self::WinRatePct => metrics.win_rate_pct,
        }
    }

    /// Drawdowns are minimized, everything else maximized.
    pub fn is_minimized(&self) -> bool {
        matches!(self, Self::MaxDrawdownPct)
    }

    /// Maps a metric value onto a score where larger is always better.
    pub fn to_heap_score(&self, value: f64) -> f64 {
        if self.is_minimized() { -value } else { value }
    }

    /// Inverse of [`Self::to_heap_score`].
    pub fn from_heap_score(&self, score: f64) -> f64 {
        self.to_heap_score(score)
    }
}
