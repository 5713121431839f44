//! Challenge/response login.
//!
//! The service never receives the access key itself. The client first asks
//! for a one-time token, then sends `md5(token ++ access_key)` as hex:
//!
//! ```text
//! AwaitingChallenge --GET getchallenge--> Authenticating --POST login--> Complete
//!        |                                      |
//!        +--------------> Failed <--------------+
//! ```
//!
//! `Failed` is the `Err` return of [`perform`]. The login response is handed
//! back untouched; whether the service accepted the digest is for the caller
//! to inspect.

use crate::credential::Credential;
use crate::error::OperationError;
use crate::request;
use abms_integration::HttpClient;
use rootcause::prelude::{Report, ResultExt};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

/// Progress of a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    /// The challenge request has not been answered yet.
    AwaitingChallenge,
    /// A token was issued and the digest is about to be sent.
    Authenticating { token: String },
    /// The service answered the login request.
    Complete { response: JsonValue },
}

/// Computes the login access key: lowercase hex MD5 of the token followed by
/// the raw access key.
#[must_use]
pub fn derive_access_key(token: &str, access_key: &str) -> String {
    let digest = md5::compute(format!("{token}{access_key}"));
    hex::encode(digest.as_ref())
}

/// Runs the two-step login and returns the service's login response.
///
/// The second request is only sent if the challenge succeeded.
///
/// # Errors
///
/// Returns `Transport` if either request fails, `RemoteChallenge` if the
/// service refused to issue a token, and `MalformedChallenge` if it claimed
/// success without one.
#[instrument(skip(client, credential), fields(username = %credential.username()))]
pub async fn perform<H>(
    client: &H,
    credential: &Credential,
) -> Result<JsonValue, Report<OperationError>>
where
    H: HttpClient + ?Sized,
{
    let mut state = LoginState::AwaitingChallenge;
    loop {
        state = match state {
            LoginState::AwaitingChallenge => {
                let response = client
                    .send(request::challenge(credential))
                    .await
                    .context(OperationError::Transport {
                        operation: request::GET_CHALLENGE.to_string(),
                    })?;
                let token = challenge_token(&response)?;
                debug!("challenge token issued");
                LoginState::Authenticating { token }
            }
            LoginState::Authenticating { token } => {
                let digest = derive_access_key(&token, credential.access_key());
                let response = client
                    .send(request::login(credential, &digest))
                    .await
                    .context(OperationError::Transport {
                        operation: "login".to_string(),
                    })?;
                LoginState::Complete { response }
            }
            LoginState::Complete { response } => return Ok(response),
        };
    }
}

/// Extracts `result.token` from a challenge response.
fn challenge_token(response: &JsonValue) -> Result<String, Report<OperationError>> {
    let succeeded = response.get("success").and_then(JsonValue::as_bool) == Some(true);
    if !succeeded {
        let message = remote_error_message(response);
        warn!(error = %message, "challenge request refused");
        return Err(OperationError::RemoteChallenge { message }.into());
    }

    match response.pointer("/result/token") {
        Some(JsonValue::String(token)) => Ok(token.clone()),
        Some(other) => Err(OperationError::MalformedChallenge {
            reason: format!("token is not a string: {other}"),
        }
        .into()),
        None => Err(OperationError::MalformedChallenge {
            reason: "response has no result.token".to_string(),
        }
        .into()),
    }
}

/// Formats the service error as `"<message> (<code>)"`.
fn remote_error_message(response: &JsonValue) -> String {
    let error = response.get("error");
    let message = error
        .and_then(|e| e.get("message"))
        .map(text)
        .unwrap_or_else(|| "challenge request failed".to_string());
    let code = error
        .and_then(|e| e.get("code"))
        .map(text)
        .unwrap_or_else(|| "UNKNOWN".to_string());
    format!("{message} ({code})")
}

fn text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClient;
    use abms_integration::{HttpMethod, TransportError};
    use serde_json::json;

    fn credential() -> Credential {
        Credential::new("https://crm.example.com", "admin", "secret")
    }

    #[test]
    fn access_key_is_md5_of_token_and_key() {
        assert_eq!(
            derive_access_key("tok123", "secret"),
            "c80c0b616111d540d9087c8bb3e389b7"
        );
        assert_eq!(
            derive_access_key("5f1a2b3c", "secretkey"),
            "f139dd642460d7a028d2e045f19ffd8c"
        );
    }

    #[test]
    fn access_key_of_empty_input() {
        assert_eq!(derive_access_key("", ""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn successful_login_sends_digest() {
        let client = RecordingClient::replying([
            json!({"success": true, "result": {"token": "tok123", "serverTime": 1, "expireTime": 2}}),
            json!({"success": true, "result": {"sessionName": "sess42", "userId": "19x1"}}),
        ]);

        let response = perform(&client, &credential()).await.expect("login");
        assert_eq!(response["result"]["sessionName"], "sess42");

        let requests = client.requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(
            requests[0].encoded_params(),
            "operation=getchallenge&username=admin"
        );

        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].path, "/webservice.php");
        assert_eq!(
            requests[1].encoded_params(),
            "operation=login&username=admin&accessKey=c80c0b616111d540d9087c8bb3e389b7"
        );
    }

    #[tokio::test]
    async fn raw_access_key_never_sent() {
        let client = RecordingClient::replying([
            json!({"success": true, "result": {"token": "tok123"}}),
            json!({"success": true}),
        ]);

        perform(&client, &credential()).await.expect("login");

        for request in client.requests() {
            assert!(
                request.params.iter().all(|(_, value)| !value.contains("secret")),
                "access key leaked in {request:?}"
            );
        }
    }

    #[tokio::test]
    async fn refused_challenge_stops_before_login() {
        let client = RecordingClient::replying([json!({
            "success": false,
            "error": {"code": "INVALID_USER", "message": "User does not exist"}
        })]);

        let err = perform(&client, &credential()).await.unwrap_err();

        assert_eq!(client.requests().len(), 1);
        assert_eq!(
            err.current_context(),
            &OperationError::RemoteChallenge {
                message: "User does not exist (INVALID_USER)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn refused_challenge_without_error_body() {
        let client = RecordingClient::replying([json!({"success": false})]);

        let err = perform(&client, &credential()).await.unwrap_err();
        assert_eq!(
            err.current_context(),
            &OperationError::RemoteChallenge {
                message: "challenge request failed (UNKNOWN)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn numeric_error_code_is_rendered() {
        let client = RecordingClient::replying([json!({
            "success": false,
            "error": {"code": 401, "message": "Denied"}
        })]);

        let err = perform(&client, &credential()).await.unwrap_err();
        assert_eq!(err.current_context().to_string(), "Denied (401)");
    }

    #[tokio::test]
    async fn challenge_without_token_is_malformed() {
        let client = RecordingClient::replying([json!({"success": true, "result": {}})]);

        let err = perform(&client, &credential()).await.unwrap_err();
        assert_eq!(client.requests().len(), 1);
        assert!(matches!(
            err.current_context(),
            OperationError::MalformedChallenge { .. }
        ));
    }

    #[tokio::test]
    async fn transport_failure_on_challenge() {
        let client = RecordingClient::new();
        client.push_reply(Err(TransportError::Timeout {
            url: "https://crm.example.com/webservice.php".to_string(),
        }));

        let err = perform(&client, &credential()).await.unwrap_err();
        assert_eq!(client.requests().len(), 1);
        assert_eq!(
            err.current_context(),
            &OperationError::Transport {
                operation: "getchallenge".to_string()
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_on_login_after_challenge() {
        let client =
            RecordingClient::replying([json!({"success": true, "result": {"token": "tok123"}})]);
        client.push_reply(Err(TransportError::Status {
            url: "https://crm.example.com/webservice.php".to_string(),
            status: 502,
        }));

        let err = perform(&client, &credential()).await.unwrap_err();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].param("operation"), Some("login"));
        assert_eq!(
            err.current_context(),
            &OperationError::Transport {
                operation: "login".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failed_login_response_is_returned_verbatim() {
        let rejected = json!({
            "success": false,
            "error": {"code": "INVALID_AUTH_TOKEN", "message": "Specified token is invalid or expired"}
        });
        let client = RecordingClient::replying([
            json!({"success": true, "result": {"token": "tok123"}}),
            rejected.clone(),
        ]);

        let response = perform(&client, &credential()).await.expect("forwarded");
        assert_eq!(response, rejected);
    }
}
