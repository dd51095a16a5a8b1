use thiserror::Error;

/// Errors raised outside of an individual smoke case.
///
/// Configuration and authentication errors abort the run before any case
/// executes. Transport and decode errors are also produced inside cases, where
/// the runner records them as case errors instead.
#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("BPM host is not set")]
    MissingHost,

    #[error("invalid BPM host `{host}`: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(
        "User Token is no longer valid (tokeninfo returned {status}). \
         Please generate a new token and try again."
    )]
    InvalidToken { status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SmokeError>;
