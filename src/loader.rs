//! Schema Loading
//!
//! Reads a single JSON Schema document from disk, a reader or a string.
//! Parsing and structural validation both go through [`SchemaNode`], so a
//! document that loads is ready to compile.

use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::schema::SchemaNode;

/// Load a schema document from a file
pub fn load_from_path(path: &Path) -> Result<SchemaNode> {
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "loaded schema document");
    load_from_str(&content)
}

/// Load a schema document from any reader (stdin, sockets, ...)
pub fn load_from_reader(mut reader: impl Read) -> Result<SchemaNode> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<SchemaNode> {
    SchemaNode::from_json_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypegenError;
    use std::io::Write;

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "object", "properties": {{"a": {{"type": "string"}}}}}}"#).unwrap();

        let root = load_from_path(file.path()).unwrap();
        assert_eq!(root.properties.as_ref().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TypegenError::Io(_)));
    }

    #[test]
    fn test_load_from_reader() {
        let root = load_from_reader(&b"{\"type\": \"string\"}"[..]).unwrap();
        assert!(root.schema_type.is_some());
    }

    #[test]
    fn test_trailing_content_is_rejected() {
        let err = load_from_str("{\"type\": \"string\"} {}").unwrap_err();
        assert!(matches!(err, TypegenError::Json(_)));
    }
}
