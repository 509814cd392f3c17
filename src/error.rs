use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}")]
    Status { status: u16 },

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider returned no usable pairs")]
    Empty,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<::config::ConfigError> for FeedError {
    fn from(err: ::config::ConfigError) -> Self {
        FeedError::Config(err.to_string())
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    /// Short label used as a metrics tag and in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Transport(_) => "transport",
            FeedError::Status { .. } => "status",
            FeedError::Decode(_) => "decode",
            FeedError::Empty => "empty",
            FeedError::Config(_) => "config",
        }
    }
}
