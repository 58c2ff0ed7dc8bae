use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    error::{IoError, TradeSimResult},
    report::{performance::PerformanceMetrics, summary::BacktestSummary},
};

/// Number of fills listed under the trade analysis section.
const LISTED_TRADES: usize = 5;

/// Human-readable markdown rendering of a backtest.
///
/// Rendered through [`fmt::Display`], so `report.to_string()` yields the document.
#[derive(Debug, Clone, Copy)]
pub struct BacktestReport<'a> {
    summary: &'a BacktestSummary,
    metrics: &'a PerformanceMetrics,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> BacktestReport<'a> {
    pub fn new(summary: &'a BacktestSummary, metrics: &'a PerformanceMetrics) -> Self {
        Self {
            summary,
            metrics,
            generated_at: None,
        }
    }

    /// Appends a `Generated on` footer.
    pub fn with_generated_at(self, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: Some(generated_at),
            ..self
        }
    }

    pub fn filename(&self) -> &'static str {
        "backtest_report.md"
    }

    /// Writes the report into `dir` and returns the path.
    #[tracing::instrument(skip(self, dir))]
    pub fn write_markdown(&self, dir: impl AsRef<Path>) -> TradeSimResult<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(IoError::from)?;

        let path = dir.join(self.filename());
        fs::write(&path, self.to_string()).map_err(IoError::from)?;

        tracing::info!(path = %path.display(), "Markdown report written");
        Ok(path)
    }
}

impl fmt::Display for BacktestReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.metrics;
        let s = self.summary;

        writeln!(f, "# Backtest Report")?;
        writeln!(f)?;
        writeln!(f, "## Performance Summary")?;
        writeln!(f, "- **Total Return**: {:.2}%", m.total_return_pct)?;
        writeln!(f, "- **Sharpe Ratio**: {:.2}", m.sharpe_ratio)?;
        writeln!(f, "- **Maximum Drawdown**: {:.2}%", m.max_drawdown_pct)?;
        writeln!(f, "- **Win Rate**: {:.2}%", m.win_rate_pct)?;
        writeln!(f, "- **Total Trades**: {}", m.total_trades)?;
        writeln!(f)?;
        writeln!(f, "## Account")?;
        writeln!(f, "- **Initial Balance**: ${:.2}", s.initial_cash)?;
        writeln!(f, "- **Final Net Worth**: ${:.2}", s.final_net_worth)?;
        writeln!(f)?;
        writeln!(f, "## Trade Analysis")?;

        if s.trade_log.is_empty() {
            writeln!(f, "No trades executed.")?;
        } else {
            writeln!(f, "First {LISTED_TRADES} trades:")?;
            for trade in s.trade_log.iter().take(LISTED_TRADES) {
                writeln!(
                    f,
                    "- {} at ${:.2} (Step {})",
                    trade.side, trade.price, trade.step_index
                )?;
            }
        }

        if let Some(at) = self.generated_at {
            writeln!(f)?;
            writeln!(
                f,
                "Generated on: {}",
                at.to_rfc3339_opts(SecondsFormat::Millis, true)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::domain::Price, gym::trading::state::EpisodeState};
    use chrono::TimeZone;

    fn round_trips(n: usize) -> BacktestSummary {
        let mut state = EpisodeState::new(1000.0);
        for _ in 0..n {
            state.buy(Price(100.0));
            state.advance();
            state.sell(Price(110.0));
            state.advance();
        }
        state.mark_to_market(Price(110.0));
        BacktestSummary::new(1000.0, &state)
    }

    #[test]
    fn renders_summary_and_first_trades() {
        let summary = round_trips(3);
        let metrics = PerformanceMetrics::from_summary(&summary);

        let md = BacktestReport::new(&summary, &metrics).to_string();

        assert!(md.starts_with("# Backtest Report\n"));
        assert!(md.contains(&format!("- **Total Return**: {:.2}%", summary.total_return_pct)));
        assert!(md.contains("- **Win Rate**: 100.00%"));
        assert!(md.contains("- **Total Trades**: 6"));
        assert!(md.contains("- **Initial Balance**: $1000.00"));
        assert!(md.contains("- BUY at $100.00 (Step 0)"));
        assert!(md.contains("- SELL at $110.00 (Step 1)"));
        assert!(md.contains("- BUY at $100.00 (Step 4)"));
        // Only the first five fills are listed.
        assert!(!md.contains("(Step 5)"));
        assert!(!md.contains("Generated on"));
    }

    #[test]
    fn empty_log_and_timestamp_footer() {
        let summary = BacktestSummary::new(1000.0, &EpisodeState::new(1000.0));
        let metrics = PerformanceMetrics::from_summary(&summary);
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let md = BacktestReport::new(&summary, &metrics)
            .with_generated_at(at)
            .to_string();

        assert!(md.contains("No trades executed."));
        assert!(md.trim_end().ends_with("Generated on: 2024-01-02T03:04:05.000Z"));
    }

    #[test]
    fn write_markdown_creates_the_file() {
        let dir = std::env::temp_dir().join(format!("tradesim-md-{}", std::process::id()));
        let summary = round_trips(1);
        let metrics = PerformanceMetrics::from_summary(&summary);
        let report = BacktestReport::new(&summary, &metrics);

        let path = report.write_markdown(&dir).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), report.to_string());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
