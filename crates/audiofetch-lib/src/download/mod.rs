mod fetcher;
mod report;
mod types;

pub use fetcher::Fetcher;
pub use report::{StatusReporter, downloading_line, error_line, success_line};
pub use types::{EntryOutcome, EntryStatus};
