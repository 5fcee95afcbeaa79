use crate::cli::FetchParams;
use crate::download::{EntryOutcome, Fetcher};
use crate::error::AudioFetchError;

/// Runs the fetcher against stdout. Per-entry failures are reported on stdout
/// and never turn into an `Err` here.
pub async fn run_fetch(params: FetchParams) -> Result<Vec<EntryOutcome>, AudioFetchError> {
    let FetchParams {
        entries,
        output_dir,
        http,
    } = params;

    let fetcher = Fetcher::new(&http)?;

    tracing::info!(
        "Fetching {} files into {}",
        entries.len(),
        output_dir.display()
    );
    // `Stdout` takes its lock per write, so nothing is held across downloads.
    let mut out = std::io::stdout();
    let outcomes = fetcher.run(&entries, &output_dir, &mut out).await;

    let downloaded = outcomes.iter().filter(|o| o.is_success()).count();
    tracing::info!(
        "{} of {} files downloaded",
        downloaded,
        outcomes.len()
    );
    Ok(outcomes)
}
