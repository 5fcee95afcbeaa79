use crate::error::AudioFetchError;
use itertools::Itertools;
use std::path::{Component, Path};
use url::Url;

pub const DEFAULT_OUTPUT_DIR: &str = "assets/audio";

const DEFAULT_TABLE: &[(&str, &str)] = &[
    (
        "west_end_blues.mp3",
        "https://archive.org/download/LouisArmstrongAndHisHotFive-WestEndBlues/LouisArmstrongAndHisHotFive-WestEndBlues.mp3",
    ),
    (
        "potato_head_blues.mp3",
        "https://archive.org/download/TheGeniusOfLouisArmstrongVolume11923-1933/12_Potato_Head_Blues.mp3",
    ),
    (
        "muskrat_ramble.mp3",
        "https://archive.org/download/TheGeniusOfLouisArmstrongVolume11923-1933/08_Muskrat_Ramble.mp3",
    ),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadEntry {
    /// File name written below the output directory
    pub filename: String,
    /// Source of the file contents
    pub url: String,
}

impl DownloadEntry {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}

pub fn default_entries() -> Vec<DownloadEntry> {
    DEFAULT_TABLE
        .iter()
        .map(|(filename, url)| DownloadEntry::new(*filename, *url))
        .collect()
}

/// Rejects tables the fetcher could not honour: duplicate names, names that
/// would escape the output directory, and non-HTTP sources.
pub fn validate_entries(entries: &[DownloadEntry]) -> Result<(), AudioFetchError> {
    if let Some(duplicate) = entries.iter().map(|e| e.filename.as_str()).duplicates().next() {
        return Err(AudioFetchError::EntryValidation {
            filename: duplicate.to_string(),
            details: "filename appears more than once".to_string(),
        });
    }

    for entry in entries {
        let mut components = Path::new(&entry.filename).components();
        let is_plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !entry.filename.contains(['/', '\\']);
        if !is_plain_name {
            return Err(AudioFetchError::EntryValidation {
                filename: entry.filename.clone(),
                details: "filename must be a single path component".to_string(),
            });
        }

        let url = Url::parse(&entry.url).map_err(|e| AudioFetchError::EntryValidation {
            filename: entry.filename.clone(),
            details: format!("invalid URL {}: {}", entry.url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AudioFetchError::EntryValidation {
                filename: entry.filename.clone(),
                details: format!("unsupported URL scheme {}", url.scheme()),
            });
        }
    }

    Ok(())
}
