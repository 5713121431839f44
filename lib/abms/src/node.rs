//! The ABMS node as seen by the workflow host.
//!
//! [`AbmsNode`] binds a dispatcher to a resolved credential and exposes it
//! through the [`Connector`] interface. Responses are wrapped into an
//! [`ItemBatch`] for downstream nodes.

use crate::credential::Credential;
use crate::description::{self, NodeDescription, OPERATION_PARAMETER};
use crate::dispatcher::{self, Dispatcher};
use crate::error::OperationError;
use crate::operation::{Field, FieldBag, OperationName};
use abms_core::ItemBatch;
use abms_integration::{
    Connector, ConnectorCapability, ConnectorError, ConnectorInfo, HttpClient, Operation,
    OperationInfo, OperationMetadata, OperationResult,
};
use async_trait::async_trait;
use rootcause::prelude::{Report, ResultExt};
use serde_json::{Value as JsonValue, json};
use std::time::Instant;
use tracing::{info, warn};

/// Connector id of the node.
pub const CONNECTOR_ID: &str = "abms";

/// ABMS node bound to one credential.
#[derive(Debug)]
pub struct AbmsNode<H> {
    dispatcher: Dispatcher<H>,
    credential: Credential,
}

impl<H: HttpClient> AbmsNode<H> {
    /// Creates a node sending requests through `client`.
    #[must_use]
    pub fn new(client: H, credential: Credential) -> Self {
        Self {
            dispatcher: Dispatcher::new(client),
            credential,
        }
    }

    /// Returns the node description for the host editor.
    #[must_use]
    pub fn description() -> NodeDescription {
        description::node_description()
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<H> {
        &self.dispatcher
    }

    /// Runs the node over a batch of resolved parameter objects, one per
    /// input item.
    ///
    /// Only the first item's parameters are read and exactly one operation
    /// is executed, whatever the batch size. An empty batch behaves like a
    /// single item without parameters. A missing operation means login; an
    /// operation that is not a string is not implemented.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's error; no partial output is produced.
    pub async fn run(&self, items: &[JsonValue]) -> Result<ItemBatch, Report<OperationError>> {
        let empty = JsonValue::Object(Default::default());
        let parameters = items.first().unwrap_or(&empty);
        let operation = match parameters.get(OPERATION_PARAMETER) {
            None => OperationName::Login.as_str(),
            Some(JsonValue::String(name)) => name.as_str(),
            Some(other) => {
                warn!(operation = %other, "operation parameter is not a string");
                return Err(OperationError::NotImplemented {
                    operation: other.to_string(),
                }
                .into());
            }
        };

        let fields = FieldBag::from_parameters(parameters);
        let response = self
            .dispatcher
            .execute(operation, &self.credential, &fields)
            .await?;
        Ok(ItemBatch::from_json(response))
    }
}

fn input_schema(operation: OperationName) -> JsonValue {
    let required: Vec<&str> = operation
        .required_fields()
        .iter()
        .map(Field::parameter_name)
        .collect();
    let properties: serde_json::Map<String, JsonValue> = operation
        .required_fields()
        .iter()
        .map(|field| {
            let schema = if field.is_json() {
                json!({})
            } else {
                json!({"type": "string"})
            };
            (field.parameter_name().to_string(), schema)
        })
        .collect();

    json!({
        "type": "object",
        "required": required,
        "properties": properties,
    })
}

fn operation_description(operation: OperationName) -> &'static str {
    match operation {
        OperationName::Create => "Create a record of the given element type",
        OperationName::Delete => "Delete a record by webservice id",
        OperationName::Describe => "Describe the fields of an element type",
        OperationName::ExtendSession => "Extend the current session",
        OperationName::ListTypes => "List the element types available to the user",
        OperationName::Login => "Log in and obtain a session name",
        OperationName::Logout => "End the current session",
        OperationName::Query => "Run a query against the service",
        OperationName::Retrieve => "Retrieve a record by webservice id",
        OperationName::Sync => "Fetch records changed since a point in time",
        OperationName::Update => "Update a record",
    }
}

/// Maps a dispatcher failure onto the connector error taxonomy.
fn connector_error(operation: &str, error: &OperationError) -> ConnectorError {
    match error {
        OperationError::NotImplemented { operation } => ConnectorError::OperationNotSupported {
            operation: operation.clone(),
        },
        OperationError::MissingField { .. }
        | OperationError::InvalidField { .. }
        | OperationError::InvalidCredential => ConnectorError::InvalidParameters {
            operation: operation.to_string(),
            reason: error.to_string(),
        },
        OperationError::RemoteChallenge { .. } | OperationError::MalformedChallenge { .. } => {
            ConnectorError::AuthenticationFailed {
                reason: error.to_string(),
            }
        }
        OperationError::Transport { .. } => ConnectorError::ConnectionFailed {
            reason: error.to_string(),
        },
    }
}

#[async_trait]
impl<H: HttpClient> Connector for AbmsNode<H> {
    fn info(&self) -> ConnectorInfo {
        let description = Self::description();
        ConnectorInfo {
            id: CONNECTOR_ID.to_string(),
            name: description.display_name,
            description: "ABMS web service operations".to_string(),
            protocol: "rest".to_string(),
            operations: OperationName::ALL
                .into_iter()
                .map(|op| OperationInfo {
                    name: op.as_str().to_string(),
                    description: operation_description(op).to_string(),
                    input_schema: input_schema(op),
                    implemented: op.is_implemented(),
                })
                .collect(),
            capabilities: vec![
                ConnectorCapability::Read,
                ConnectorCapability::Write,
                ConnectorCapability::Update,
                ConnectorCapability::Delete,
                ConnectorCapability::ApiKey,
            ],
        }
    }

    async fn execute(
        &self,
        operation: Operation,
    ) -> Result<OperationResult, Report<ConnectorError>> {
        let started = Instant::now();
        let fields = FieldBag::from_parameters(&operation.parameters);

        let response = match self
            .dispatcher
            .execute(&operation.name, &self.credential, &fields)
            .await
        {
            Ok(response) => response,
            Err(report) => {
                let mapped = connector_error(&operation.name, report.current_context());
                return Err(report).context(mapped);
            }
        };

        let api_calls = OperationName::parse(&operation.name).map_or(0, dispatcher::api_calls);
        let metadata = OperationMetadata {
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            api_calls,
        };
        info!(
            operation = %operation.name,
            latency_ms = metadata.latency_ms,
            "operation completed"
        );

        Ok(OperationResult::success(
            ItemBatch::from_json(response),
            metadata,
        ))
    }

    async fn health_check(&self) -> Result<bool, Report<ConnectorError>> {
        Ok(self.credential.validate().is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClient;

    fn credential() -> Credential {
        Credential::new("https://crm.example.com", "admin", "secret")
    }

    #[tokio::test]
    async fn run_wraps_response_object_in_one_item() {
        let client = RecordingClient::replying([json!({
            "success": true,
            "result": {"id": "12x34", "lastname": "Doe"}
        })]);
        let node = AbmsNode::new(client, credential());

        let batch = node
            .run(&[json!({
                "operation": "retrieve",
                "session_name_field": "abc",
                "webservice_id_field": "12x34"
            })])
            .await
            .expect("retrieve");

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.items()[0].json["result"]["lastname"], "Doe");
    }

    #[tokio::test]
    async fn run_reads_only_the_first_item() {
        let node = AbmsNode::new(RecordingClient::new(), credential());

        node.run(&[
            json!({"operation": "retrieve", "session_name_field": "abc", "webservice_id_field": "1x1"}),
            json!({"operation": "retrieve", "session_name_field": "abc", "webservice_id_field": "2x2"}),
        ])
        .await
        .expect("retrieve");

        let requests = node.dispatcher().client().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].param("id"), Some("1x1"));
    }

    #[tokio::test]
    async fn run_defaults_to_login() {
        let node = AbmsNode::new(
            RecordingClient::replying([
                json!({"success": true, "result": {"token": "tok123"}}),
                json!({"success": true, "result": {"sessionName": "sess42"}}),
            ]),
            credential(),
        );

        let batch = node.run(&[]).await.expect("login");

        assert_eq!(batch.items()[0].json["result"]["sessionName"], "sess42");
        assert_eq!(node.dispatcher().client().requests().len(), 2);
    }

    #[tokio::test]
    async fn run_rejects_non_string_operation_without_requests() {
        let node = AbmsNode::new(RecordingClient::new(), credential());

        for operation in [json!(5), json!(null), json!(["login"])] {
            let err = node
                .run(&[json!({"operation": operation})])
                .await
                .unwrap_err();

            assert_eq!(
                err.current_context(),
                &OperationError::NotImplemented {
                    operation: operation.to_string()
                }
            );
        }
        assert!(node.dispatcher().client().requests().is_empty());
    }

    #[tokio::test]
    async fn execute_reports_api_calls() {
        let node = AbmsNode::new(RecordingClient::new(), credential());

        let result = node
            .execute(
                Operation::new("listtypes").with_param("session_name_field", json!("abc")),
            )
            .await
            .expect("listtypes");

        assert_eq!(result.metadata.api_calls, 1);
        assert_eq!(result.items.len(), 1);
    }

    #[tokio::test]
    async fn execute_maps_stub_to_not_supported() {
        let node = AbmsNode::new(RecordingClient::new(), credential());

        let err = node.execute(Operation::new("sync")).await.unwrap_err();

        assert_eq!(
            err.current_context(),
            &ConnectorError::OperationNotSupported {
                operation: "sync".to_string()
            }
        );
        assert!(node.dispatcher().client().requests().is_empty());
    }

    #[tokio::test]
    async fn execute_maps_missing_field_to_invalid_parameters() {
        let node = AbmsNode::new(RecordingClient::new(), credential());

        let err = node
            .execute(Operation::new("query").with_param("session_name_field", json!("abc")))
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidParameters { operation, .. } if operation == "query"
        ));
    }

    #[tokio::test]
    async fn execute_maps_refused_challenge_to_authentication_failure() {
        let node = AbmsNode::new(
            RecordingClient::replying([json!({
                "success": false,
                "error": {"code": "INVALID_USER", "message": "User does not exist"}
            })]),
            credential(),
        );

        let err = node.execute(Operation::new("login")).await.unwrap_err();

        assert_eq!(
            err.current_context(),
            &ConnectorError::AuthenticationFailed {
                reason: "User does not exist (INVALID_USER)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn execute_maps_challenge_without_token_to_authentication_failure() {
        let node = AbmsNode::new(
            RecordingClient::replying([json!({"success": true, "result": {}})]),
            credential(),
        );

        let err = node.execute(Operation::new("login")).await.unwrap_err();

        assert!(matches!(
            err.current_context(),
            ConnectorError::AuthenticationFailed { reason }
                if reason.contains("result.token")
        ));
        assert_eq!(node.dispatcher().client().requests().len(), 1);
    }

    #[test]
    fn info_lists_operations_with_schemas() {
        let node = AbmsNode::new(RecordingClient::new(), credential());
        let info = node.info();

        assert_eq!(info.id, "abms");
        assert_eq!(info.name, "ABMS");
        assert_eq!(info.operations.len(), 11);

        let create = info.operation("create").expect("create");
        assert!(create.implemented);
        assert_eq!(
            create.input_schema["required"],
            json!(["session_name_field", "elementType_field", "element_field"])
        );

        assert!(!info.operation("logout").expect("logout").implemented);
        assert!(node.supports(ConnectorCapability::ApiKey));
    }

    #[tokio::test]
    async fn health_check_reflects_credential() {
        let healthy = AbmsNode::new(RecordingClient::new(), credential());
        assert!(healthy.health_check().await.expect("health"));

        let broken = AbmsNode::new(
            RecordingClient::new(),
            Credential::new("crm.example.com", "admin", "secret"),
        );
        assert!(!broken.health_check().await.expect("health"));
        assert!(broken.dispatcher().client().requests().is_empty());

        let unparsable = AbmsNode::new(
            RecordingClient::new(),
            Credential::new("https://crm example.com", "admin", "secret"),
        );
        assert!(!unparsable.health_check().await.expect("health"));
    }
}
