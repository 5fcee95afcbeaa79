use crate::error::FetchError;
use std::path::PathBuf;

#[derive(Debug)]
pub enum EntryStatus {
    Downloaded { path: PathBuf, size: u64 },
    Failed(FetchError),
}

/// What happened to one entry during a run.
#[derive(Debug)]
pub struct EntryOutcome {
    pub filename: String,
    pub status: EntryStatus,
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, EntryStatus::Downloaded { .. })
    }

    pub fn size(&self) -> Option<u64> {
        match self.status {
            EntryStatus::Downloaded { size, .. } => Some(size),
            EntryStatus::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.status {
            EntryStatus::Downloaded { .. } => None,
            EntryStatus::Failed(err) => Some(err),
        }
    }
}
