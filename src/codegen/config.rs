//! Render Profiles
//!
//! Per-target rendering configuration: type mappings, optionality wrappers
//! and layout. Compilation is profile-free; only the emitter reads a profile.

use serde::{Deserialize, Serialize};

use crate::primitive::Primitive;

// =============================================================================
// Target
// =============================================================================

/// Supported output languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// `TypedDict` classes
    #[default]
    Python,
    /// serde structs
    Rust,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Rust => "rust",
        }
    }

    /// Conventional file extension for generated output
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Rust => "rs",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Type Mappings
// =============================================================================

/// Target spelling of each JSON primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMappings {
    pub string: String,
    pub number: String,
    pub integer: String,
    pub boolean: String,
    pub null: String,
}

impl TypeMappings {
    pub fn python() -> Self {
        Self {
            string: "str".to_string(),
            number: "Union[float, int]".to_string(),
            integer: "int".to_string(),
            boolean: "bool".to_string(),
            null: "None".to_string(),
        }
    }

    pub fn rust() -> Self {
        Self {
            string: "String".to_string(),
            number: "f64".to_string(),
            integer: "i64".to_string(),
            boolean: "bool".to_string(),
            null: "()".to_string(),
        }
    }

    pub fn for_target(target: Target) -> Self {
        match target {
            Target::Python => Self::python(),
            Target::Rust => Self::rust(),
        }
    }

    pub fn get(&self, primitive: Primitive) -> &str {
        match primitive {
            Primitive::String => &self.string,
            Primitive::Number => &self.number,
            Primitive::Integer => &self.integer,
            Primitive::Boolean => &self.boolean,
            Primitive::Null => &self.null,
        }
    }

    /// Replace the mappings named in `overrides`
    pub fn with_overrides(mut self, overrides: &TypeOverrides) -> Self {
        let slots = [
            (&mut self.string, &overrides.string),
            (&mut self.number, &overrides.number),
            (&mut self.integer, &overrides.integer),
            (&mut self.boolean, &overrides.boolean),
            (&mut self.null, &overrides.null),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        self
    }
}

/// Optional per-primitive replacements, as read from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null: Option<String>,
}

// =============================================================================
// Render Profile
// =============================================================================

/// Language-specific rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderProfile {
    pub target: Target,

    /// Type mappings for JSON scalars
    pub types: TypeMappings,

    /// Emit the "generated, do not edit" banner
    pub header: bool,

    /// Spaces per indentation level
    pub indent: usize,

    /// Derives placed on every Rust struct
    pub derives: Vec<String>,
}

pub const DEFAULT_INDENT: usize = 4;

pub fn default_derives() -> Vec<String> {
    ["Debug", "Clone", "PartialEq", "Serialize", "Deserialize"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl RenderProfile {
    /// Default Python profile
    pub fn python() -> Self {
        Self::for_target(Target::Python)
    }

    /// Default Rust profile
    pub fn rust() -> Self {
        Self::for_target(Target::Rust)
    }

    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            types: TypeMappings::for_target(target),
            header: true,
            indent: DEFAULT_INDENT,
            derives: default_derives(),
        }
    }

    /// One level of indentation
    pub fn indent_str(&self) -> String {
        " ".repeat(self.indent)
    }

    /// Whether generated Rust structs carry serde attributes
    pub fn uses_serde(&self) -> bool {
        self.derives
            .iter()
            .any(|d| d == "Serialize" || d == "Deserialize")
    }

    /// Wrap a type to make it optional (missing)
    pub fn wrap_optional(&self, type_str: &str) -> String {
        match self.target {
            Target::Rust => format!("Option<{}>", type_str),
            // TypedDict expresses optionality through `total=False`
            Target::Python => type_str.to_string(),
        }
    }

    /// Wrap a type in Box (Rust only, for recursion)
    pub fn wrap_box(&self, type_str: &str) -> String {
        match self.target {
            Target::Rust => format!("Box<{}>", type_str),
            Target::Python => type_str.to_string(),
        }
    }
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::python()
    }
}

// =============================================================================
// Keywords
// =============================================================================

pub(crate) const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct",
    "super", "trait", "true", "type", "unsafe", "use", "where", "while",
    "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

pub(crate) const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let python = RenderProfile::python();
        assert_eq!(python.types.number, "Union[float, int]");
        assert_eq!(python.types.null, "None");
        assert_eq!(python.indent_str(), "    ");

        let rust = RenderProfile::rust();
        assert_eq!(rust.types.string, "String");
        assert_eq!(rust.types.integer, "i64");
        assert!(rust.uses_serde());
    }

    #[test]
    fn test_wrappers() {
        let rust = RenderProfile::rust();
        assert_eq!(rust.wrap_optional("String"), "Option<String>");
        assert_eq!(rust.wrap_box("Root"), "Box<Root>");

        let python = RenderProfile::python();
        assert_eq!(python.wrap_optional("str"), "str");
        assert_eq!(python.wrap_box("Root"), "Root");
    }

    #[test]
    fn test_type_overrides() {
        let overrides = TypeOverrides {
            number: Some("float".to_string()),
            ..Default::default()
        };
        let types = TypeMappings::python().with_overrides(&overrides);
        assert_eq!(types.get(Primitive::Number), "float");
        assert_eq!(types.get(Primitive::String), "str");
    }
}
