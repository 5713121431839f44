//! Connector trait and related types.
//!
//! A connector wraps one external service behind a uniform interface: the host
//! asks for its metadata, then executes named operations with JSON parameters.

use crate::error::ConnectorError;
use abms_core::ItemBatch;
use async_trait::async_trait;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Information about a connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorInfo {
    /// Unique identifier for this connector type.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the connector.
    pub description: String,
    /// Protocol used (e.g., "rest").
    pub protocol: String,
    /// Available operations.
    pub operations: Vec<OperationInfo>,
    /// Capabilities of this connector.
    pub capabilities: Vec<ConnectorCapability>,
}

impl ConnectorInfo {
    /// Looks up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationInfo> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// Information about an available operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationInfo {
    /// Operation name.
    pub name: String,
    /// Description of what the operation does.
    pub description: String,
    /// JSON schema for input parameters.
    pub input_schema: JsonValue,
    /// Whether the connector actually implements this operation.
    pub implemented: bool,
}

/// Capabilities that a connector may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorCapability {
    /// Can read data from the service.
    Read,
    /// Can write/create data in the service.
    Write,
    /// Can update existing data.
    Update,
    /// Can delete data.
    Delete,
    /// Supports API key authentication.
    ApiKey,
}

/// An operation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// The operation name.
    pub name: String,
    /// Operation parameters, keyed by host parameter name.
    pub parameters: JsonValue,
}

impl Operation {
    /// Creates a new operation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: JsonValue::Object(Default::default()),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        if let JsonValue::Object(ref mut map) = self.parameters {
            map.insert(key.into(), value);
        }
        self
    }

    /// Sets all parameters at once.
    #[must_use]
    pub fn with_parameters(mut self, parameters: JsonValue) -> Self {
        self.parameters = parameters;
        self
    }
}

/// The result of an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    /// Items produced by the operation.
    pub items: ItemBatch,
    /// Metadata about the operation.
    pub metadata: OperationMetadata,
}

/// Metadata about an operation execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Number of API calls made.
    pub api_calls: u32,
}

impl OperationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(items: ItemBatch, metadata: OperationMetadata) -> Self {
        Self { items, metadata }
    }
}

/// Trait for integration connectors.
///
/// The host executes one operation per call; a failed operation aborts the
/// invocation without partial results.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns information about this connector.
    fn info(&self) -> ConnectorInfo;

    /// Executes an operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    async fn execute(&self, operation: Operation)
    -> Result<OperationResult, Report<ConnectorError>>;

    /// Checks if the connector is usable with its current configuration.
    async fn health_check(&self) -> Result<bool, Report<ConnectorError>>;

    /// Returns the list of supported capabilities.
    fn capabilities(&self) -> Vec<ConnectorCapability> {
        self.info().capabilities
    }

    /// Checks if this connector supports a specific capability.
    fn supports(&self, capability: ConnectorCapability) -> bool {
        self.capabilities().contains(&capability)
    }
}
