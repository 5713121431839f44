//! Integration framework for the ABMS node.
//!
//! This crate provides:
//!
//! - **Connector trait**: Common interface for integrations
//! - **Credential descriptors**: Declarative credential field schemas
//! - **HTTP capability**: Injected request executor with a `reqwest` implementation

pub mod connector;
pub mod credential;
pub mod error;
pub mod http;

pub use connector::{
    Connector, ConnectorCapability, ConnectorInfo, Operation, OperationInfo, OperationMetadata,
    OperationResult,
};
pub use credential::{CredentialDescriptor, CredentialField, CredentialFieldType};
pub use error::{ConnectorError, CredentialError, TransportError};
pub use http::{FORM_URLENCODED, HttpClient, HttpMethod, HttpRequest, ReqwestHttpClient};
