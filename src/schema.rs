//! Schema document model
//!
//! Typed view of the JSON Schema keywords the compiler understands.
//! `properties` and `definitions` keep document order so generated fields
//! follow the order they were written in. Unknown keywords are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TypegenError};

/// A raw schema fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub dollar_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, SchemaNode>>,

    /// Kept as a raw value: only string keywords are resolvable
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl SchemaNode {
    /// Deserialize from an in-memory JSON tree, reporting the failing JSON path
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_path_to_error::deserialize(value).map_err(|err| TypegenError::InvalidSchema {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        })
    }

    /// Deserialize from JSON text, reporting the failing JSON path
    pub fn from_json_str(src: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(src);
        let node = serde_path_to_error::deserialize(&mut de).map_err(|err| {
            TypegenError::InvalidSchema {
                path: err.path().to_string(),
                message: err.into_inner().to_string(),
            }
        })?;
        de.end()?;
        Ok(node)
    }

    /// Whether the node declares any composition keyword
    pub fn has_composition(&self) -> bool {
        self.one_of.is_some() || self.any_of.is_some() || self.all_of.is_some()
    }

    /// Keys listed in `required`
    pub fn required_keys(&self) -> &[String] {
        self.required.as_deref().unwrap_or_default()
    }

    /// Whether `name` is listed in `required`
    pub fn is_required(&self, name: &str) -> bool {
        self.required_keys().iter().any(|key| key == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keywords_deserialize() {
        let node = SchemaNode::from_value(&json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Person",
            "type": "object",
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"$ref": "#/definitions/age"}
            },
            "definitions": {"age": {"type": "number"}},
            "required": ["zeta"],
            "x-extension": true
        }))
        .unwrap();

        assert_eq!(node.title.as_deref(), Some("Person"));
        let keys: Vec<&str> = node.properties.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(
            node.properties.as_ref().unwrap()["alpha"].reference.as_deref(),
            Some("#/definitions/age")
        );
        assert!(node.is_required("zeta"));
        assert!(!node.is_required("alpha"));
    }

    #[test]
    fn test_invalid_schema_reports_path() {
        let err = SchemaNode::from_json_str(r#"{"properties": {"a": {"required": "yes"}}}"#)
            .unwrap_err();
        match err {
            TypegenError::InvalidSchema { path, .. } => {
                assert_eq!(path, "properties.a.required");
            }
            other => panic!("Expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_composition_flag() {
        let node = SchemaNode::from_value(&json!({"anyOf": [{"type": "string"}]})).unwrap();
        assert!(node.has_composition());
        assert!(!SchemaNode::default().has_composition());
    }
}
