use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("market data unavailable for {market}: {reason}")]
    DataUnavailable { market: String, reason: String },

    #[error("competitor {competitor} not found in {market}")]
    NotFound { market: String, competitor: String },

    #[error("chat backend failure: {0}")]
    ChatBackend(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({platform}): {message}")]
    Api {
        platform: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Rate limited by {platform}")]
    RateLimit {
        platform: String,
        retry_after_secs: Option<u64>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    pub fn unavailable(market: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            market: market.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(market: impl Into<String>, competitor: impl Into<String>) -> Self {
        Self::NotFound {
            market: market.into(),
            competitor: competitor.into(),
        }
    }

    pub fn chat(msg: impl Into<String>) -> Self {
        Self::ChatBackend(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn api_with_status(
        platform: impl Into<String>,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::Api {
            platform: platform.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
