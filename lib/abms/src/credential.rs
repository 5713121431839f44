//! The ABMS credential and its descriptor.

use abms_integration::{CredentialDescriptor, CredentialError, CredentialField};
use rootcause::prelude::Report;
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Credential type name the node asks the host for.
pub const CREDENTIAL_NAME: &str = "abmsApi";

/// Returns the descriptor the host uses to render and store the credential.
#[must_use]
pub fn descriptor() -> CredentialDescriptor {
    CredentialDescriptor::new(CREDENTIAL_NAME, "ABMS Credentials API")
        .with_field(CredentialField::string("host", "Host"))
        .with_field(CredentialField::string("username", "Username"))
        .with_field(CredentialField::password("access_key", "Access Key"))
}

/// A resolved ABMS credential.
///
/// The access key is only used to derive the login digest. It is never sent
/// and never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    host: String,
    username: String,
    access_key: String,
}

impl Credential {
    /// Creates a credential.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            access_key: access_key.into(),
        }
    }

    /// Returns the base URL of the ABMS instance.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the web service user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the raw access key.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Checks that every field is set and the host is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), Report<CredentialError>> {
        for (field, value) in [
            ("host", &self.host),
            ("username", &self.username),
            ("access_key", &self.access_key),
        ] {
            if value.trim().is_empty() {
                return Err(CredentialError::MissingField {
                    field: field.to_string(),
                }
                .into());
            }
        }

        let invalid_host = |reason: String| CredentialError::InvalidHost {
            host: self.host.clone(),
            reason,
        };
        let url = Url::parse(self.host.trim()).map_err(|e| invalid_host(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid_host(format!("unsupported scheme '{}'", url.scheme())).into());
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid_host("missing host name".to_string()).into());
        }

        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("access_key", &"<redacted>")
            .finish()
    }
}
