use crate::catalog::{DEFAULT_OUTPUT_DIR, default_entries, validate_entries};
use crate::cli::args::Command;
use crate::cli::params::FetchParams;
use crate::config::load_optional_config;
use crate::error::AudioFetchError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Fetch(FetchParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, AudioFetchError> {
    match command {
        Command::Fetch { config_path } => {
            let app_config = load_optional_config(config_path.as_deref())?;

            let entries = default_entries();
            validate_entries(&entries)?;

            Ok(ResolvedCommand::Fetch(FetchParams {
                entries,
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
                http: app_config.http,
            }))
        }
    }
}
