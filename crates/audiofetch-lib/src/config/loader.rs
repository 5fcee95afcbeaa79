use super::Config;
use crate::error::AudioFetchError;
use config::Config as ConfigBuilder;

pub fn load_config(config_path: &str) -> Result<Config, AudioFetchError> {
    let config_builder = ConfigBuilder::builder()
        .add_source(config::File::with_name(config_path))
        .build()?;

    let app_config: Config = config_builder.try_deserialize()?;
    app_config
        .http
        .validate()
        .map_err(config::ConfigError::Message)?;
    Ok(app_config)
}

/// Falls back to built-in defaults when no file is given.
pub fn load_optional_config(config_path: Option<&str>) -> Result<Config, AudioFetchError> {
    match config_path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            load_config(path)
        }
        None => Ok(Config::default()),
    }
}
