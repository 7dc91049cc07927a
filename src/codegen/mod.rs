//! Code Generation
//!
//! Orders a [`Compilation`]'s declarations and renders them for a target.
//!
//! Architecture:
//! - `EmitPlan`: frozen emission order plus the lookups renderers need
//!   (position of every declared name, component of every reference)
//! - Renderers (`python`, `rust`): consume the plan and a [`RenderProfile`]
//!
//! Renderers never read the schema document, only declarations.

pub mod config;
pub mod names;
pub mod python;
pub mod rust;

pub use config::{RenderProfile, Target, TypeMappings, TypeOverrides};

use std::collections::HashMap;
use tracing::debug;

use crate::compiler::Compilation;
use crate::declaration::{Declaration, DeclarationKind, TypeRef};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TypegenError};
use crate::reference::Reference;

// =============================================================================
// Emit Plan
// =============================================================================

/// Emission order and lookups shared by every renderer
pub struct EmitPlan<'a> {
    /// Renderable declarations, dependencies first
    declarations: Vec<&'a Declaration>,

    /// Generated name -> index in `declarations`
    positions: HashMap<&'a str, usize>,

    /// Reference -> strongly connected component id
    components: HashMap<Reference, usize>,
}

impl<'a> EmitPlan<'a> {
    pub fn new(compilation: &'a Compilation) -> Self {
        let declarations: Vec<&Declaration> = compilation
            .ordered_declarations()
            .into_iter()
            .filter(|d| d.is_renderable())
            .collect();

        let positions = declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.as_str(), i))
            .collect();

        let mut components = HashMap::new();
        for (id, members) in compilation.graph().components().into_iter().enumerate() {
            for member in members {
                components.insert(member, id);
            }
        }

        Self {
            declarations,
            positions,
            components,
        }
    }

    pub fn declarations(&self) -> &[&'a Declaration] {
        &self.declarations
    }

    pub fn lookup(&self, name: &str) -> Option<&'a Declaration> {
        self.positions.get(name).map(|&i| self.declarations[i])
    }

    /// Whether `target`'s declaration is rendered at or after position `at`
    pub fn is_forward(&self, at: usize, target: &Reference) -> bool {
        self.positions
            .get(target.unique_name().as_str())
            .map_or(false, |&position| position >= at)
    }

    /// Whether two references sit on a common `$ref` cycle
    pub fn same_component(&self, a: &Reference, b: &Reference) -> bool {
        match (self.components.get(a), self.components.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Every named type a declaration mentions must itself be rendered
    fn validate(&self) -> Result<()> {
        for declaration in &self.declarations {
            let targets = declaration
                .fields()
                .iter()
                .map(|f| &f.ty)
                .chain(match &declaration.kind {
                    DeclarationKind::Alias { target } => Some(target),
                    _ => None,
                });
            for ty in targets {
                if let TypeRef::Named(target) = ty {
                    if self.lookup(&target.unique_name()).is_none() {
                        return Err(TypegenError::UnresolvedReference {
                            reference: declaration.reference.to_pointer(),
                            target: target.to_pointer(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// Output from code generation
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Generated code as a string
    pub code: String,
    /// Number of types generated
    pub type_count: usize,
    /// Findings carried over from compilation
    pub diagnostics: Diagnostics,
}

// =============================================================================
// Emitter
// =============================================================================

/// Renders a compilation with one profile
pub struct Emitter<'a> {
    compilation: &'a Compilation,
    profile: &'a RenderProfile,
}

impl<'a> Emitter<'a> {
    pub fn new(compilation: &'a Compilation, profile: &'a RenderProfile) -> Self {
        Self {
            compilation,
            profile,
        }
    }

    pub fn render(&self) -> Result<GeneratedOutput> {
        let plan = EmitPlan::new(self.compilation);
        plan.validate()?;

        let code = match self.profile.target {
            Target::Python => python::render(&plan, self.profile),
            Target::Rust => rust::render(&plan, self.profile),
        };

        debug!(
            target = %self.profile.target,
            types = plan.declarations.len(),
            bytes = code.len(),
            "rendered"
        );

        Ok(GeneratedOutput {
            code,
            type_count: plan.declarations.len(),
            diagnostics: self.compilation.diagnostics().clone(),
        })
    }
}

/// Doc text split into trimmed-right lines
pub(crate) fn doc_lines(description: &str) -> impl Iterator<Item = &str> {
    description.trim().lines().map(str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_value;
    use serde_json::json;

    #[test]
    fn test_plan_skips_empty_partials() {
        let compilation = compile_value(&json!({"type": "object", "properties": {}})).unwrap();
        let plan = EmitPlan::new(&compilation);
        let names: Vec<&str> = plan.declarations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Root"]);
    }

    #[test]
    fn test_plan_orders_dependencies_first() {
        let compilation = compile_value(&json!({
            "type": "object",
            "properties": {
                "hi": {"type": "object", "properties": {"hello": {"type": "number"}}}
            }
        }))
        .unwrap();
        let plan = EmitPlan::new(&compilation);
        let hi = Reference::parse("#/properties/hi").unwrap();
        let hi_at = plan.positions[hi.unique_name().as_str()];
        let root_optional_at = plan.positions["RootOptional"];
        let root_at = plan.positions["Root"];

        assert!(hi_at < root_optional_at);
        assert!(root_optional_at < root_at);
        assert!(!plan.is_forward(root_optional_at, &hi));
    }

    #[test]
    fn test_recursive_target_is_forward() {
        let compilation = compile_value(&json!({
            "type": "object",
            "properties": {"next": {"$ref": "#"}}
        }))
        .unwrap();
        let plan = EmitPlan::new(&compilation);
        let partial_at = plan.positions["RootOptional"];
        let root = Reference::root();

        assert!(plan.is_forward(partial_at, &root));
        assert!(plan.same_component(&(Reference::root() + "properties"), &root));
    }

    #[test]
    fn test_render_reports_type_count() {
        let compilation = compile_value(&json!({
            "properties": {"a": {"type": "string"}},
            "required": ["a"]
        }))
        .unwrap();
        let output = Emitter::new(&compilation, &RenderProfile::python()).render().unwrap();
        assert_eq!(output.type_count, 2);
        assert!(output.diagnostics.is_empty());
    }
}
