//! Operation dispatch.
//!
//! The dispatcher turns one operation plus its field values into one request
//! (two for login), sends it through the injected [`HttpClient`] and returns
//! the response body untouched. It keeps no state between calls.

use crate::credential::Credential;
use crate::error::OperationError;
use crate::login;
use crate::operation::{FieldBag, OperationName};
use crate::request;
use abms_core::Result;
use abms_integration::HttpClient;
use rootcause::prelude::ResultExt;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

/// Executes ABMS operations through an HTTP capability.
#[derive(Debug, Clone)]
pub struct Dispatcher<H> {
    client: H,
}

impl<H: HttpClient> Dispatcher<H> {
    /// Creates a dispatcher sending requests through `client`.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self { client }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub fn client(&self) -> &H {
        &self.client
    }

    /// Executes an operation given by name.
    ///
    /// Unknown names fail the same way as the stub operations.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute_operation`].
    pub async fn execute(
        &self,
        operation: &str,
        credential: &Credential,
        fields: &FieldBag,
    ) -> Result<JsonValue, OperationError> {
        let Some(operation) = OperationName::parse(operation) else {
            warn!(operation, "unknown operation requested");
            return Err(OperationError::NotImplemented {
                operation: operation.to_string(),
            }
            .into());
        };
        self.execute_operation(operation, credential, fields).await
    }

    /// Executes an operation.
    ///
    /// # Errors
    ///
    /// Fails without any request for stub operations, an invalid credential
    /// or missing fields. Transport failures are returned as `Transport` with
    /// the client's report as cause. Application-level failures reported by
    /// the service are not errors; they come back as the response body.
    #[instrument(skip(self, credential, fields), fields(operation = %operation))]
    pub async fn execute_operation(
        &self,
        operation: OperationName,
        credential: &Credential,
        fields: &FieldBag,
    ) -> Result<JsonValue, OperationError> {
        if !operation.is_implemented() {
            return Err(OperationError::NotImplemented {
                operation: operation.to_string(),
            }
            .into());
        }

        credential
            .validate()
            .context(OperationError::InvalidCredential)?;

        if operation == OperationName::Login {
            return login::perform(&self.client, credential).await;
        }

        let request = request::build(operation, credential, fields)?;
        debug!(
            method = %request.method,
            params = ?request.param_names(),
            "dispatching request"
        );

        self.client
            .send(request)
            .await
            .context(OperationError::Transport {
                operation: operation.to_string(),
            })
    }
}

/// Number of requests an operation issues when it succeeds.
#[must_use]
pub const fn api_calls(operation: OperationName) -> u32 {
    match operation {
        OperationName::Login => 2,
        op if op.is_implemented() => 1,
        _ => 0,
    }
}
