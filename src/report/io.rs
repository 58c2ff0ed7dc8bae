use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{IoError, TradeSimResult},
    report::{leaderboard::Leaderboard, performance::PerformanceMetrics, summary::BacktestSummary},
};

// ================================================================================================
// Traits
// ================================================================================================

pub trait ReportName {
    fn base_name(&self) -> String;

    fn filename(&self) -> String {
        format!("{}.json", self.base_name())
    }
}

pub trait ToJson {
    /// Serializes the report to a generic JSON value.
    fn to_json(&self) -> TradeSimResult<Value>;

    /// Writes the report as pretty-printed JSON to `path`, creating parent directories.
    fn write_json(&self, path: impl AsRef<Path>) -> TradeSimResult<()>;

    /// Writes the report into `dir` under its [`ReportName::filename`] and returns the path.
    fn write_json_to_dir(&self, dir: impl AsRef<Path>) -> TradeSimResult<PathBuf>
    where
        Self: ReportName,
    {
        let path = dir.as_ref().join(self.filename());
        self.write_json(&path)?;
        Ok(path)
    }
}

impl<T> ToJson for T
where
    T: Serialize,
{
    fn to_json(&self) -> TradeSimResult<Value> {
        Ok(serde_json::to_value(self).map_err(IoError::from)?)
    }

    #[tracing::instrument(skip(self, path))]
    fn write_json(&self, path: impl AsRef<Path>) -> TradeSimResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(IoError::from)?;
        }

        let mut writer = BufWriter::new(File::create(path).map_err(IoError::from)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(IoError::from)?;
        writer.flush().map_err(IoError::from)?;

        tracing::info!(path = %path.display(), "Report written");
        Ok(())
    }
}

// ================================================================================================
// Report Names
// ================================================================================================

impl ReportName for BacktestSummary {
    fn base_name(&self) -> String {
        "backtest_summary".to_string()
    }
}

impl ReportName for PerformanceMetrics {
    fn base_name(&self) -> String {
        "performance_metrics".to_string()
    }
}

impl ReportName for Leaderboard {
    fn base_name(&self) -> String {
        "leaderboard".to_string()
    }
}
