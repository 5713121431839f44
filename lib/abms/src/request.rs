//! Request templates for the ABMS web service.
//!
//! Every call goes to one endpoint and names itself with an `operation`
//! parameter. Reads use GET with a query string; writes and login use POST
//! with a form-encoded body. Building a request is pure; nothing here talks
//! to the network.

use crate::credential::Credential;
use crate::error::OperationError;
use crate::operation::{FieldBag, OperationName};
use abms_integration::{HttpMethod, HttpRequest};
use rootcause::prelude::Report;

/// Path of the web service endpoint, relative to the credential host.
pub const ENDPOINT_PATH: &str = "/webservice.php";

/// Operation name of the first login step.
pub const GET_CHALLENGE: &str = "getchallenge";

/// Returns the method an implemented operation uses.
///
/// Login is excluded because it spans two requests.
#[must_use]
pub const fn method_for(operation: OperationName) -> Option<HttpMethod> {
    match operation {
        OperationName::Describe
        | OperationName::ListTypes
        | OperationName::Query
        | OperationName::Retrieve => Some(HttpMethod::Get),
        OperationName::Create | OperationName::Delete | OperationName::Update => {
            Some(HttpMethod::Post)
        }
        OperationName::Login
        | OperationName::Logout
        | OperationName::ExtendSession
        | OperationName::Sync => None,
    }
}

/// Builds the single request for a non-login operation.
///
/// # Errors
///
/// Returns `NotImplemented` for login and the stub operations, and a field
/// error if a required field is missing or malformed.
pub fn build(
    operation: OperationName,
    credential: &Credential,
    fields: &FieldBag,
) -> Result<HttpRequest, Report<OperationError>> {
    let method = method_for(operation).ok_or_else(|| OperationError::NotImplemented {
        operation: operation.to_string(),
    })?;

    let mut request = match method {
        HttpMethod::Get => HttpRequest::get(credential.host(), ENDPOINT_PATH),
        HttpMethod::Post => HttpRequest::post_form(credential.host(), ENDPOINT_PATH),
    }
    .with_param("operation", operation.as_str());

    for field in operation.required_fields() {
        let value = fields.wire_value(operation, *field)?;
        request = request.with_param(field.wire_name(), value);
    }

    Ok(request)
}

/// Builds the challenge request that starts a login.
#[must_use]
pub fn challenge(credential: &Credential) -> HttpRequest {
    HttpRequest::get(credential.host(), ENDPOINT_PATH)
        .with_param("operation", GET_CHALLENGE)
        .with_param("username", credential.username())
}

/// Builds the login request carrying the derived access key.
#[must_use]
pub fn login(credential: &Credential, access_key_digest: &str) -> HttpRequest {
    HttpRequest::post_form(credential.host(), ENDPOINT_PATH)
        .with_param("operation", OperationName::Login.as_str())
        .with_param("username", credential.username())
        .with_param("accessKey", access_key_digest)
}
