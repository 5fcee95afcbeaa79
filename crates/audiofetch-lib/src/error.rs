use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioFetchError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid download entry {filename}: {details}")]
    EntryValidation { filename: String, details: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

/// Failure of a single entry. Rendered verbatim after `Error downloading {filename}: `.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not create output directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("HTTP Error {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not move download into place at {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read size of {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FetchError {
    /// reqwest's own `Display` stops at "error sending request"; keep the
    /// underlying causes so DNS/connect failures are legible in one line.
    pub(crate) fn request(url: &str, err: reqwest::Error) -> Self {
        let mut reason = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }
        FetchError::Request {
            url: url.to_string(),
            reason,
        }
    }
}
