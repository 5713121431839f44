//! Node description presented to the workflow host.
//!
//! The description drives the host's editor: which operations exist, which
//! fields to show for each, and which credential the node needs.

use crate::credential::CREDENTIAL_NAME;
use crate::operation::{Field, OperationName};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Name of the operation selector parameter.
pub const OPERATION_PARAMETER: &str = "operation";

/// Static description of the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: String,
    pub name: String,
    pub group: Vec<String>,
    pub version: u32,
    pub subtitle: String,
    pub description: String,
    pub icon: String,
    pub default_name: String,
    pub credentials: Vec<CredentialRequirement>,
    pub properties: Vec<ParameterDescription>,
}

impl NodeDescription {
    /// Looks up a parameter by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ParameterDescription> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns the parameters shown when `operation` is selected.
    #[must_use]
    pub fn visible_properties(&self, operation: OperationName) -> Vec<&ParameterDescription> {
        self.properties
            .iter()
            .filter(|p| p.is_visible(operation))
            .collect()
    }
}

/// A credential the node requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequirement {
    pub name: String,
    pub required: bool,
}

/// Input widget type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Options,
    String,
    Json,
}

/// One selectable value of an options parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOption {
    pub name: String,
    pub value: String,
}

/// Show/hide rules keyed on the selected operation.
///
/// A parameter with `show` rules is visible only for the listed operations.
/// A parameter with `hide` rules is visible for every other operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub show: Vec<OperationName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<OperationName>,
}

/// A parameter of the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescription {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    pub required: bool,
    pub default: JsonValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl ParameterDescription {
    fn field(field: Field, display_name: &str, parameter_type: ParameterType) -> Self {
        Self {
            display_name: display_name.to_string(),
            name: field.parameter_name().to_string(),
            parameter_type,
            required: true,
            default: JsonValue::String(String::new()),
            options: Vec::new(),
            display_options: None,
            placeholder: None,
            rows: None,
        }
    }

    fn shown_for(mut self, operations: &[OperationName]) -> Self {
        self.display_options = Some(DisplayOptions {
            show: operations.to_vec(),
            hide: Vec::new(),
        });
        self
    }

    /// Returns true if the parameter is shown for `operation`.
    #[must_use]
    pub fn is_visible(&self, operation: OperationName) -> bool {
        let Some(rules) = &self.display_options else {
            return true;
        };
        if rules.hide.contains(&operation) {
            return false;
        }
        rules.show.is_empty() || rules.show.contains(&operation)
    }
}

/// Builds the node description.
#[must_use]
pub fn node_description() -> NodeDescription {
    let operation = ParameterDescription {
        display_name: "Operation".to_string(),
        name: OPERATION_PARAMETER.to_string(),
        parameter_type: ParameterType::Options,
        required: true,
        default: JsonValue::String(OperationName::Login.as_str().to_string()),
        options: OperationName::ALL
            .into_iter()
            .map(|op| ParameterOption {
                name: op.display_name().to_string(),
                value: op.as_str().to_string(),
            })
            .collect(),
        display_options: None,
        placeholder: None,
        rows: None,
    };

    let mut session_name =
        ParameterDescription::field(Field::SessionName, "Session Name", ParameterType::String);
    session_name.display_options = Some(DisplayOptions {
        show: Vec::new(),
        hide: vec![OperationName::Login],
    });
    session_name.placeholder = Some("Obtained through Login Operation".to_string());

    let element = ParameterDescription::field(Field::Element, "Element", ParameterType::Json)
        .shown_for(&[OperationName::Create, OperationName::Update]);

    let element_type =
        ParameterDescription::field(Field::ElementType, "Element Type", ParameterType::String)
            .shown_for(&[OperationName::Create, OperationName::Describe]);

    let webservice_id =
        ParameterDescription::field(Field::WebserviceId, "Webservice ID", ParameterType::String)
            .shown_for(&[OperationName::Retrieve, OperationName::Delete]);

    let mut query = ParameterDescription::field(Field::Query, "Query", ParameterType::String)
        .shown_for(&[OperationName::Query]);
    query.rows = Some(4);

    NodeDescription {
        display_name: "ABMS".to_string(),
        name: "abmsNode".to_string(),
        group: vec!["transform".to_string()],
        version: 1,
        subtitle: "={{ $parameter[\"operation\"] }}".to_string(),
        description: "ABMS Node".to_string(),
        icon: "file:abms.svg".to_string(),
        default_name: "Abms".to_string(),
        credentials: vec![CredentialRequirement {
            name: CREDENTIAL_NAME.to_string(),
            required: true,
        }],
        properties: vec![
            operation,
            session_name,
            element,
            element_type,
            webservice_id,
            query,
        ],
    }
}
