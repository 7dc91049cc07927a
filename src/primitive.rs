//! Type Resolver
//!
//! Maps a schema's `type` keyword to a target-independent primitive.
//! Target spellings live in [`crate::codegen::TypeMappings`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Result, TypegenError};
use crate::reference::Reference;

/// JSON scalar kinds that resolve without a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    /// Any JSON number (float or integer)
    Number,
    Integer,
    Boolean,
    Null,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Primitive(Primitive),
    /// Object node: the caller compiles it instead
    NotApplicable,
}

/// Resolve the `type` keyword of the node at `reference`
pub fn resolve_type(reference: &Reference, keyword: &Value) -> Result<Resolution> {
    let primitive = match keyword.as_str() {
        Some("object") => return Ok(Resolution::NotApplicable),
        Some("string") => Primitive::String,
        Some("number") => Primitive::Number,
        Some("integer") => Primitive::Integer,
        Some("boolean") => Primitive::Boolean,
        Some("null") => Primitive::Null,
        Some(other) => return Err(unsupported(reference, other)),
        None => return Err(unsupported(reference, &keyword.to_string())),
    };
    Ok(Resolution::Primitive(primitive))
}

fn unsupported(reference: &Reference, type_name: &str) -> TypegenError {
    TypegenError::UnsupportedType {
        reference: reference.to_pointer(),
        type_name: type_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_mapping() {
        let root = Reference::root();
        assert_eq!(
            resolve_type(&root, &json!("string")).unwrap(),
            Resolution::Primitive(Primitive::String)
        );
        assert_eq!(
            resolve_type(&root, &json!("number")).unwrap(),
            Resolution::Primitive(Primitive::Number)
        );
        assert_eq!(
            resolve_type(&root, &json!("boolean")).unwrap(),
            Resolution::Primitive(Primitive::Boolean)
        );
        assert_eq!(
            resolve_type(&root, &json!("null")).unwrap(),
            Resolution::Primitive(Primitive::Null)
        );
        assert_eq!(
            resolve_type(&root, &json!("integer")).unwrap(),
            Resolution::Primitive(Primitive::Integer)
        );
        assert_eq!(resolve_type(&root, &json!("object")).unwrap(), Resolution::NotApplicable);
    }

    #[test]
    fn test_unsupported_types() {
        let reference = Reference::root() + "properties" + "tags";
        match resolve_type(&reference, &json!("array")) {
            Err(TypegenError::UnsupportedType { reference, type_name }) => {
                assert_eq!(reference, "#/properties/tags");
                assert_eq!(type_name, "array");
            }
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }

        assert!(matches!(
            resolve_type(&reference, &json!(["string", "null"])),
            Err(TypegenError::UnsupportedType { .. })
        ));
    }
}
