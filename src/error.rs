use thiserror::Error;

pub type TradeSimResult<T> = Result<T, TradeSimError>;

#[derive(Debug, Error)]
pub enum TradeSimError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors occurring within Agent logic or execution.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid input to agent: {0}")]
    InvalidInput(String),

    #[error("Agent UID {0} missing from leaderboard cache")]
    Uncached(u64),
}

/// Errors related to market feed construction, parsing and record validation.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Invalid market record at index {index}: {msg}")]
    InvalidRecord { index: usize, msg: String },

    #[error("Invalid indicator window: {0}")]
    InvalidWindow(String),

    #[error("Failed to parse market feed: {0}")]
    FeedParse(#[from] serde_json::Error),

    #[error("Failed to parse float: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

/// Errors related to the simulator configuration and the step interface.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid environment configuration: {0}")]
    Configuration(String),

    #[error("Invalid action value {0}: expected 0 (hold), 1 (buy) or 2 (sell)")]
    InvalidAction(i64),

    #[error("Progress bar error")]
    ProgressBar(#[from] indicatif::style::TemplateError),
}

/// Errors related to file I/O and result serialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),
}
