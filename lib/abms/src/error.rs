//! Error types for the ABMS node.
//!
//! Errors are designed for layered context using rootcause:
//! - `OperationError`: Failures of a single node invocation. Transport and
//!   credential reports from the integration crate are kept as causes and
//!   wrapped with the variant describing what the node was doing.

use std::fmt;

/// Errors from executing an ABMS operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The operation is a stub or unknown. No request was sent.
    NotImplemented { operation: String },
    /// A field the operation requires was not supplied.
    MissingField {
        operation: String,
        field: &'static str,
    },
    /// A field value has the wrong shape.
    InvalidField { field: &'static str, reason: String },
    /// The credential failed validation.
    InvalidCredential,
    /// The challenge step of login reported failure.
    RemoteChallenge { message: String },
    /// The challenge step succeeded without a usable token.
    MalformedChallenge { reason: String },
    /// The HTTP capability failed while performing the operation.
    Transport { operation: String },
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented { operation } => {
                write!(f, "{operation} operation is not implemented.")
            }
            Self::MissingField { operation, field } => {
                write!(f, "operation '{operation}' requires field '{field}'")
            }
            Self::InvalidField { field, reason } => {
                write!(f, "invalid value for field '{field}': {reason}")
            }
            Self::InvalidCredential => write!(f, "invalid ABMS credential"),
            Self::RemoteChallenge { message } => f.write_str(message),
            Self::MalformedChallenge { reason } => {
                write!(f, "malformed challenge response: {reason}")
            }
            Self::Transport { operation } => {
                write!(f, "request for operation '{operation}' failed")
            }
        }
    }
}

impl std::error::Error for OperationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_implemented_message() {
        let err = OperationError::NotImplemented {
            operation: "sync".to_string(),
        };
        assert_eq!(err.to_string(), "sync operation is not implemented.");
    }

    #[test]
    fn remote_challenge_shows_remote_message_verbatim() {
        let err = OperationError::RemoteChallenge {
            message: "User does not exist (INVALID_USER)".to_string(),
        };
        assert_eq!(err.to_string(), "User does not exist (INVALID_USER)");
    }

    #[test]
    fn missing_field_names_the_wire_field() {
        let err = OperationError::MissingField {
            operation: "retrieve".to_string(),
            field: "id",
        };
        assert!(err.to_string().contains("'id'"));
        assert!(err.to_string().contains("retrieve"));
    }
}
