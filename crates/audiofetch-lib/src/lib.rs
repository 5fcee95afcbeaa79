pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;

pub use catalog::DownloadEntry;
pub use config::Config;
pub use error::{AudioFetchError, FetchError};
