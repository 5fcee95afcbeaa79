mod loader;
mod model;

pub use loader::{load_config, load_optional_config};
pub use model::{Config, DEFAULT_CONNECT_TIMEOUT_SECS, HttpConfig};
