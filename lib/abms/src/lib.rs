//! ABMS web service node.
//!
//! The node maps eleven operations onto the service's single RPC endpoint:
//!
//! - **Dispatcher**: one request per operation, built from a fixed table
//! - **Login**: challenge/response handshake deriving an MD5 access key
//! - **Credential**: host, username and access key, plus its descriptor
//! - **Node**: host-facing description and [`Connector`](abms_integration::Connector) implementation
//!
//! HTTP is injected through [`abms_integration::HttpClient`], so everything
//! here runs without a network in tests.

pub mod credential;
pub mod description;
pub mod dispatcher;
pub mod error;
pub mod login;
pub mod node;
pub mod operation;
pub mod request;

#[cfg(test)]
mod testing;

pub use credential::Credential;
pub use description::{NodeDescription, node_description};
pub use dispatcher::Dispatcher;
pub use error::OperationError;
pub use node::AbmsNode;
pub use operation::{Field, FieldBag, OperationName};
