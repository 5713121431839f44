//! Workflow items exchanged with the host.
//!
//! The host passes data between nodes as batches of items, each carrying a
//! JSON object under `json`. A node response is wrapped the same way the host
//! wraps any JSON payload: an array becomes one item per element, anything
//! else becomes a single item.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single workflow item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The item's data.
    pub json: JsonValue,
}

impl Item {
    /// Creates an item holding the given data.
    #[must_use]
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Returns the value of a top-level key, if the item holds an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.json.get(key)
    }
}

/// An ordered batch of items produced by one node invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemBatch(Vec<Item>);

impl ItemBatch {
    /// Wraps a JSON payload into a batch.
    ///
    /// Arrays are spread into one item per element. Every other value,
    /// including `null`, becomes a single item.
    #[must_use]
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Array(values) => Self(values.into_iter().map(Item::new).collect()),
            other => Self(vec![Item::new(other)]),
        }
    }

    /// Returns the items in the batch.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.0
    }

    /// Returns the first item, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Item> {
        self.0.first()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the batch holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the batch into a JSON array of items.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(
            self.0
                .iter()
                .map(|item| serde_json::json!({ "json": item.json }))
                .collect(),
        )
    }
}
