//! Operations and the fields they carry.

use crate::error::OperationError;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// An operation the node exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationName {
    Create,
    Delete,
    Describe,
    ExtendSession,
    #[serde(rename = "listtypes")]
    ListTypes,
    Login,
    Logout,
    Query,
    Retrieve,
    Sync,
    Update,
}

impl OperationName {
    /// All operations, in the order the node lists them.
    pub const ALL: [Self; 11] = [
        Self::Create,
        Self::Delete,
        Self::Describe,
        Self::ExtendSession,
        Self::ListTypes,
        Self::Login,
        Self::Logout,
        Self::Query,
        Self::Retrieve,
        Self::Sync,
        Self::Update,
    ];

    /// Parses an operation name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Returns the wire name, also used as the `operation` parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Describe => "describe",
            Self::ExtendSession => "extend_session",
            Self::ListTypes => "listtypes",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Query => "query",
            Self::Retrieve => "retrieve",
            Self::Sync => "sync",
            Self::Update => "update",
        }
    }

    /// Returns the label shown in the host's operation picker.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Delete => "Delete",
            Self::Describe => "Describe",
            Self::ExtendSession => "Extend Session",
            Self::ListTypes => "List Types",
            Self::Login => "Login",
            Self::Logout => "Logout",
            Self::Query => "Query",
            Self::Retrieve => "Retrieve",
            Self::Sync => "Sync",
            Self::Update => "Update",
        }
    }

    /// Returns false for the operations that are declared but not available.
    #[must_use]
    pub const fn is_implemented(&self) -> bool {
        !matches!(self, Self::ExtendSession | Self::Logout | Self::Sync)
    }

    /// Returns the user-supplied fields the operation requires, in wire order.
    ///
    /// Login takes everything it needs from the credential.
    #[must_use]
    pub const fn required_fields(&self) -> &'static [Field] {
        match self {
            Self::Create => &[Field::SessionName, Field::ElementType, Field::Element],
            Self::Delete => &[Field::SessionName, Field::WebserviceId],
            Self::Describe => &[Field::SessionName, Field::ElementType],
            Self::ListTypes => &[Field::SessionName],
            Self::Query => &[Field::SessionName, Field::Query],
            Self::Retrieve => &[Field::SessionName, Field::WebserviceId],
            Self::Update => &[Field::SessionName, Field::Element],
            Self::Login | Self::Logout | Self::ExtendSession | Self::Sync => &[],
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-supplied field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Session token from a prior login.
    SessionName,
    /// Module name, e.g. "Contacts".
    ElementType,
    /// Record payload as JSON.
    Element,
    /// Web service record id, e.g. "12x34".
    WebserviceId,
    /// Query in the service's query language.
    Query,
}

impl Field {
    /// All fields, in the order the node lists them.
    pub const ALL: [Self; 5] = [
        Self::SessionName,
        Self::Element,
        Self::ElementType,
        Self::WebserviceId,
        Self::Query,
    ];

    /// Returns the parameter name sent to the remote service.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::SessionName => "sessionName",
            Self::ElementType => "elementType",
            Self::Element => "element",
            Self::WebserviceId => "id",
            Self::Query => "query",
        }
    }

    /// Returns the parameter name the host resolves values under.
    #[must_use]
    pub const fn parameter_name(&self) -> &'static str {
        match self {
            Self::SessionName => "session_name_field",
            Self::ElementType => "elementType_field",
            Self::Element => "element_field",
            Self::WebserviceId => "webservice_id_field",
            Self::Query => "query_field",
        }
    }

    /// Returns true if the field holds arbitrary JSON rather than a string.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Element)
    }
}

/// Field values for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag {
    values: BTreeMap<Field, JsonValue>,
}

impl FieldBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<JsonValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, field: Field, value: impl Into<JsonValue>) {
        self.values.insert(field, value.into());
    }

    /// Builds a bag from a resolved host parameter object.
    ///
    /// Keys are host parameter names (e.g. `session_name_field`). Keys that
    /// are not fields, and non-object input, are ignored.
    #[must_use]
    pub fn from_parameters(parameters: &JsonValue) -> Self {
        let mut bag = Self::new();
        for field in Field::ALL {
            if let Some(value) = parameters.get(field.parameter_name()) {
                bag.insert(field, value.clone());
            }
        }
        bag
    }

    /// Returns the raw value of a field. `null` counts as absent.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&JsonValue> {
        self.values.get(&field).filter(|value| !value.is_null())
    }

    /// Returns the value of a field as sent on the wire.
    ///
    /// String fields must hold JSON strings. The element field is sent
    /// verbatim when it already is JSON text, otherwise it is serialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or has the wrong type.
    pub fn wire_value(
        &self,
        operation: OperationName,
        field: Field,
    ) -> Result<String, Report<OperationError>> {
        let value = self.get(field).ok_or_else(|| OperationError::MissingField {
            operation: operation.to_string(),
            field: field.wire_name(),
        })?;

        match value {
            JsonValue::String(text) => Ok(text.clone()),
            other if field.is_json() => Ok(other.to_string()),
            other => Err(OperationError::InvalidField {
                field: field.wire_name(),
                reason: format!("expected a string, got {}", json_type(other)),
            }
            .into()),
        }
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
