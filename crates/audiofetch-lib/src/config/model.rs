use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct HttpConfig {
    /// Limit on establishing a connection
    pub connect_timeout_secs: Option<u64>,
    /// Limit on a whole transfer, unset means wait indefinitely
    pub timeout_secs: Option<u64>,
    /// Sent as `User-Agent` when set
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Some(DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// A zero timeout would fail every request before it starts.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("http.connect_timeout_secs", self.connect_timeout_secs),
            ("http.timeout_secs", self.timeout_secs),
        ] {
            if value == Some(0) {
                return Err(format!(
                    "{name} must be greater than 0; omit it to use the default"
                ));
            }
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
