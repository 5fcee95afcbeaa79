use super::report::StatusReporter;
use super::types::{EntryOutcome, EntryStatus};
use crate::catalog::DownloadEntry;
use crate::config::HttpConfig;
use crate::error::{AudioFetchError, FetchError};
use futures::StreamExt;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const PARTIAL_SUFFIX: &str = ".part";

/// Sequentially downloads entries into an output directory.
///
/// Each entry is fetched to `<name>.part` and renamed over `<name>` only once the
/// whole body has been written, so a failed transfer never clobbers an earlier
/// copy and never leaves a truncated file under the final name.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(http: &HttpConfig) -> Result<Self, AudioFetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(connect_timeout) = http.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(timeout) = http.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &http.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Downloads every entry in order, writing two status lines per entry to `out`.
    ///
    /// Never fails as a whole: each entry's error is reported and recorded in its
    /// outcome, and the loop moves on to the next entry.
    pub async fn run<W: Write>(
        &self,
        entries: &[DownloadEntry],
        output_dir: impl AsRef<Path>,
        out: &mut W,
    ) -> Vec<EntryOutcome> {
        let output_dir = output_dir.as_ref();

        let dir_ready = tokio::fs::create_dir_all(output_dir).await;
        if let Err(err) = &dir_ready {
            warn!(output = %output_dir.display(), "Failed to create output directory: {}", err);
        }

        let mut reporter = StatusReporter::new(out);
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            reporter.downloading(&entry.filename);

            let result = match &dir_ready {
                Ok(()) => self.fetch_entry(entry, output_dir).await,
                Err(err) => Err(FetchError::CreateDirectory {
                    path: output_dir.to_path_buf(),
                    source: std::io::Error::new(err.kind(), err.to_string()),
                }),
            };

            let status = match result {
                Ok((path, size)) => {
                    reporter.success(&entry.filename, size);
                    info!(file = %entry.filename, output = %path.display(), size, "Downloaded");
                    EntryStatus::Downloaded { path, size }
                }
                Err(err) => {
                    reporter.error(&entry.filename, &err);
                    warn!(file = %entry.filename, url = %entry.url, "Download failed: {}", err);
                    EntryStatus::Failed(err)
                }
            };

            outcomes.push(EntryOutcome {
                filename: entry.filename.clone(),
                status,
            });
        }

        outcomes
    }

    async fn fetch_entry(
        &self,
        entry: &DownloadEntry,
        output_dir: &Path,
    ) -> Result<(PathBuf, u64), FetchError> {
        let output_path = output_dir.join(&entry.filename);
        let partial_path = partial_path_for(&output_path);
        tracing::debug!(
            file = %entry.filename,
            url = %entry.url,
            output = %output_path.display(),
            "Requesting"
        );

        let response = self
            .client
            .get(&entry.url)
            .send()
            .await
            .map_err(|e| FetchError::request(&entry.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: entry.url.clone(),
                status,
            });
        }

        let persisted = async {
            write_body(response, &entry.url, &partial_path).await?;
            tokio::fs::rename(&partial_path, &output_path)
                .await
                .map_err(|source| FetchError::Persist {
                    path: output_path.clone(),
                    source,
                })
        }
        .await;

        if let Err(err) = persisted {
            discard_partial(&partial_path).await;
            return Err(err);
        }

        let size = tokio::fs::metadata(&output_path)
            .await
            .map_err(|source| FetchError::Metadata {
                path: output_path.clone(),
                source,
            })?
            .len();

        Ok((output_path, size))
    }
}

async fn write_body(
    response: reqwest::Response,
    url: &str,
    partial_path: &Path,
) -> Result<(), FetchError> {
    let write_error = |source| FetchError::Write {
        path: partial_path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::create(partial_path)
        .await
        .map_err(write_error)?;
    let mut writer = tokio::io::BufWriter::new(file);

    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| FetchError::request(url, e))?;
        writer.write_all(&chunk).await.map_err(write_error)?;
    }

    writer.flush().await.map_err(write_error)?;
    Ok(())
}

async fn discard_partial(partial_path: &Path) {
    match tokio::fs::remove_file(partial_path).await {
        Ok(()) => {
            tracing::debug!(output = %partial_path.display(), "Removed partial download")
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            warn!(output = %partial_path.display(), "Failed to remove partial download: {}", err)
        }
    }
}

fn partial_path_for(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    output_path.with_file_name(name)
}
