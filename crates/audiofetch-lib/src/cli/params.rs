use crate::catalog::DownloadEntry;
use crate::config::HttpConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FetchParams {
    pub entries: Vec<DownloadEntry>,
    pub output_dir: PathBuf,
    pub http: HttpConfig,
}
