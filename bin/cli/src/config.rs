//! Runner configuration.
//!
//! Loaded via the `config` crate from environment variables, using `__` to
//! separate sections: `ABMS__HOST`, `ABMS__USERNAME`, `ABMS__ACCESS_KEY` and
//! `HTTP__TIMEOUT_SECONDS`.

use abms_node::Credential;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Runner configuration composed from the credential and HTTP settings.
#[derive(Debug, Deserialize)]
pub struct CliConfig {
    /// ABMS credential.
    pub abms: AbmsConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// The ABMS credential as configured.
#[derive(Clone, Deserialize)]
pub struct AbmsConfig {
    /// Base URL of the ABMS instance.
    pub host: String,
    /// Web service user name.
    pub username: String,
    /// Access key from the user's preferences page.
    pub access_key: String,
}

impl AbmsConfig {
    /// Returns the credential handed to the node.
    #[must_use]
    pub fn credential(&self) -> Credential {
        Credential::new(&self.host, &self.username, &self.access_key)
    }
}

impl fmt::Debug for AbmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbmsConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds. Zero disables the timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl HttpConfig {
    /// Returns the request timeout, if one is set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

/// Environment source with `__` as the section separator.
///
/// Values stay strings so access keys and user names that look like numbers
/// or booleans are kept verbatim. Numeric settings are converted during
/// deserialization.
fn environment() -> Environment {
    Environment::default().separator("__")
}

impl CliConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_builder(config::Config::builder().add_source(environment()))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
