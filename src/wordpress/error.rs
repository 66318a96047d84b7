//! Errors raised while talking to the CMS

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordPressError {
    #[error("invalid WordPress URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {kind} found with {key} {value}")]
    NotFound {
        kind: &'static str,
        key: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, WordPressError>;
