//! Declarations
//!
//! The compiled output unit. Each object node yields up to two partials
//! (one per requiredness class) plus a Combined declaration merging them;
//! primitives bound under `definitions` yield an Alias.

use serde::{Deserialize, Serialize};

use crate::primitive::Primitive;
use crate::reference::Reference;

/// Resolved type of a property or alias
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Inline scalar
    Primitive(Primitive),
    /// The Combined or Alias declaration owned by this reference
    Named(Reference),
}

impl TypeRef {
    /// Generated name for named types, `None` for primitives
    pub fn declared_name(&self) -> Option<String> {
        match self {
            Self::Primitive(_) => None,
            Self::Named(reference) => Some(reference.unique_name()),
        }
    }
}

/// A single property of a partial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Property key as written in the schema
    pub name: String,
    pub ty: TypeRef,
    pub required: bool,
}

/// What a declaration is, with its kind-specific body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclarationKind {
    RequiredPartial { fields: Vec<Field> },
    OptionalPartial { fields: Vec<Field> },
    /// Structural merge of the named partials (optional first)
    Combined { supers: Vec<String> },
    Alias { target: TypeRef },
}

impl DeclarationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RequiredPartial { .. } => "required",
            Self::OptionalPartial { .. } => "optional",
            Self::Combined { .. } => "combined",
            Self::Alias { .. } => "alias",
        }
    }
}

/// One compiled declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Owning reference (`<node>/properties` for partials)
    pub reference: Reference,
    pub name: String,
    pub kind: DeclarationKind,
    pub description: Option<String>,
}

impl Declaration {
    pub fn partial(
        reference: Reference,
        name: String,
        required: bool,
        fields: Vec<Field>,
    ) -> Self {
        let kind = if required {
            DeclarationKind::RequiredPartial { fields }
        } else {
            DeclarationKind::OptionalPartial { fields }
        };
        Self {
            reference,
            name,
            kind,
            description: None,
        }
    }

    pub fn combined(reference: Reference, supers: Vec<String>, description: Option<String>) -> Self {
        Self {
            name: reference.unique_name(),
            reference,
            kind: DeclarationKind::Combined { supers },
            description,
        }
    }

    pub fn alias(reference: Reference, target: TypeRef, description: Option<String>) -> Self {
        Self {
            name: reference.unique_name(),
            reference,
            kind: DeclarationKind::Alias { target },
            description,
        }
    }

    /// Fields of a partial, empty otherwise
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            DeclarationKind::RequiredPartial { fields } | DeclarationKind::OptionalPartial { fields } => fields,
            _ => &[],
        }
    }

    /// Supers of a Combined declaration, empty otherwise
    pub fn supers(&self) -> &[String] {
        match &self.kind {
            DeclarationKind::Combined { supers } => supers,
            _ => &[],
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::RequiredPartial { .. } | DeclarationKind::OptionalPartial { .. }
        )
    }

    /// Whether this declaration binds the unique name of its reference
    pub fn is_identity(&self) -> bool {
        matches!(self.kind, DeclarationKind::Combined { .. } | DeclarationKind::Alias { .. })
    }

    /// Whether the emitter renders this declaration.
    ///
    /// Empty partials are elided.
    pub fn is_renderable(&self) -> bool {
        !(self.is_partial() && self.fields().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_partial_is_not_renderable() {
        let reference = Reference::root() + "properties";
        let partial = Declaration::partial(reference, "RootOptional".to_string(), false, Vec::new());
        assert!(!partial.is_renderable());

        let combined = Declaration::combined(Reference::root(), Vec::new(), None);
        assert!(combined.is_renderable());
        assert_eq!(combined.name, "Root");
        assert!(combined.supers().is_empty());
        assert!(combined.fields().is_empty());
    }

    #[test]
    fn test_declared_name() {
        assert_eq!(TypeRef::Primitive(Primitive::String).declared_name(), None);
        assert_eq!(TypeRef::Named(Reference::root()).declared_name(), Some("Root".to_string()));
    }
}
