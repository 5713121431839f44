//! Credential descriptors.
//!
//! A descriptor tells the host which fields a connector's credential has and
//! how to render them. Storage and encryption belong to the host; connectors
//! only ever see a resolved credential for the duration of one execution.

use serde::{Deserialize, Serialize};

/// How a credential field is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialFieldType {
    /// Plain text.
    String,
    /// Secret text, masked in the UI and never logged.
    Password,
}

/// A single field of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialField {
    /// Field name as stored by the host.
    pub name: String,
    /// Label shown to users.
    pub display_name: String,
    /// Field type.
    pub field_type: CredentialFieldType,
    /// Whether the host must refuse an empty value.
    pub required: bool,
}

impl CredentialField {
    /// Creates a required plain-text field.
    #[must_use]
    pub fn string(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            field_type: CredentialFieldType::String,
            required: true,
        }
    }

    /// Creates a required secret field.
    #[must_use]
    pub fn password(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            field_type: CredentialFieldType::Password,
            required: true,
        }
    }

    /// Returns true if the value must be masked.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.field_type == CredentialFieldType::Password
    }
}

/// Declarative description of a credential type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDescriptor {
    /// Credential type name referenced by connectors.
    pub name: String,
    /// Label shown to users.
    pub display_name: String,
    /// Fields, in display order.
    pub fields: Vec<CredentialField>,
}

impl CredentialDescriptor {
    /// Creates a descriptor without fields.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: CredentialField) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&CredentialField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the names of required fields.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }
}
