//! Wire shape of a SciGraph API document.
//!
//! These structs mirror the JSON one to one. Type descriptors stay as raw
//! [`Value`]s here and are interpreted by [`super::types`], which knows where
//! each one sits in the document.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDocument {
    pub api_version: Option<String>,
    pub base_path: Option<String>,
    pub info: Option<RawInfo>,
    #[serde(default)]
    pub produces: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    pub apis: Vec<RawResource>,
    #[serde(default)]
    pub models: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawInfo {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawResource {
    pub resource_path: String,
    pub description: Option<String>,
    pub produces: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    #[serde(default)]
    pub apis: Vec<RawApi>,
    #[serde(default)]
    pub models: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawApi {
    pub path: String,
    #[serde(default)]
    pub operations: Vec<RawOperation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawOperation {
    pub method: String,
    pub nickname: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub descriptor: RawDescriptor,
    pub produces: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    #[serde(default)]
    pub response_messages: Vec<RawResponseMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawParameter {
    pub name: String,
    pub param_type: String,
    #[serde(flatten)]
    pub descriptor: RawDescriptor,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allow_multiple: bool,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

/// The type-descriptor keys that operations and parameters carry inline.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDescriptor {
    #[serde(rename = "type")]
    pub ty: Option<Value>,
    pub format: Option<Value>,
    pub items: Option<Value>,
    #[serde(rename = "$ref")]
    pub reference: Option<Value>,
    #[serde(rename = "enum")]
    pub values: Option<Value>,
    pub properties: Option<Value>,
    pub required: Option<Value>,
}

impl RawDescriptor {
    /// True when no type information was given at all.
    pub fn is_empty(&self) -> bool {
        self.ty.is_none() && self.reference.is_none() && self.properties.is_none()
    }

    /// Reassembles the descriptor as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        let entries = [
            ("type", &self.ty),
            ("format", &self.format),
            ("items", &self.items),
            ("$ref", &self.reference),
            ("enum", &self.values),
            ("properties", &self.properties),
            ("required", &self.required),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                map.insert(key.to_string(), value.clone());
            }
        }
        Value::Object(map)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawResponseMessage {
    pub code: Value,
    pub message: Option<String>,
    pub response_model: Option<String>,
    pub schema: Option<Value>,
}
