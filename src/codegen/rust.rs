//! Rust Code Emitter
//!
//! Generates serde structs from declarations using RenderProfile for
//! configuration.
//!
//! Key constraints:
//! - Partials become structs; optional fields are `Option<T>` and skipped
//!   when absent
//! - Combined declarations flatten their partials
//! - A field whose type shares a `$ref` cycle with its struct is boxed

use super::names::{rust_field_names, rust_string_literal, unraw};
use super::{doc_lines, EmitPlan, RenderProfile};
use crate::declaration::{Declaration, DeclarationKind, Field, TypeRef};

// =============================================================================
// Public API
// =============================================================================

/// Render every declaration in the plan
pub fn render(plan: &EmitPlan<'_>, profile: &RenderProfile) -> String {
    let mut output = String::new();

    if profile.header {
        output.push_str("//! Generated from JSON schema - DO NOT EDIT\n");
        output.push_str("//!\n");
        output.push_str("//! This file is generated by `schema-typegen generate --target rust`.\n\n");
    }

    let has_structs = plan
        .declarations()
        .iter()
        .any(|d| !matches!(d.kind, DeclarationKind::Alias { .. }));
    if has_structs && profile.uses_serde() {
        output.push_str("use serde::{Deserialize, Serialize};\n\n");
    }

    let blocks: Vec<String> = plan
        .declarations()
        .iter()
        .map(|declaration| emit_declaration(plan, profile, declaration))
        .collect();
    output.push_str(&blocks.join("\n"));
    output
}

// =============================================================================
// Declaration Emission
// =============================================================================

fn emit_declaration(plan: &EmitPlan<'_>, profile: &RenderProfile, declaration: &Declaration) -> String {
    let mut output = String::new();

    if let Some(description) = &declaration.description {
        for line in doc_lines(description) {
            if line.is_empty() {
                output.push_str("///\n");
            } else {
                output.push_str(&format!("/// {}\n", line));
            }
        }
    }

    match &declaration.kind {
        DeclarationKind::RequiredPartial { fields } | DeclarationKind::OptionalPartial { fields } => {
            emit_derives(&mut output, profile);
            emit_struct(&mut output, plan, profile, declaration, fields);
        }
        DeclarationKind::Combined { supers } => {
            emit_derives(&mut output, profile);
            emit_combined(&mut output, plan, profile, declaration, supers);
        }
        DeclarationKind::Alias { target } => {
            output.push_str(&format!(
                "pub type {} = {};\n",
                declaration.name,
                type_name(profile, target)
            ));
        }
    }

    output
}

fn emit_derives(output: &mut String, profile: &RenderProfile) {
    if !profile.derives.is_empty() {
        output.push_str(&format!("#[derive({})]\n", profile.derives.join(", ")));
    }
}

// =============================================================================
// Struct Emission
// =============================================================================

fn emit_struct(
    output: &mut String,
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    declaration: &Declaration,
    fields: &[Field],
) {
    let indent = profile.indent_str();
    let names = rust_field_names(fields.iter().map(|f| f.name.as_str()));

    output.push_str(&format!("pub struct {} {{\n", declaration.name));
    for (field, rust_name) in fields.iter().zip(names) {
        emit_field(output, plan, profile, declaration, field, &rust_name, &indent);
    }
    output.push_str("}\n");
}

fn emit_field(
    output: &mut String,
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    declaration: &Declaration,
    field: &Field,
    rust_name: &str,
    indent: &str,
) {
    let mut attrs = Vec::new();
    if unraw(rust_name) != field.name {
        attrs.push(format!("rename = {}", rust_string_literal(&field.name)));
    }
    if !field.required {
        attrs.push("default".to_string());
        attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
    }
    if profile.uses_serde() && !attrs.is_empty() {
        output.push_str(&format!("{}#[serde({})]\n", indent, attrs.join(", ")));
    }

    let mut ty = type_name(profile, &field.ty);
    if let TypeRef::Named(target) = &field.ty {
        if plan.same_component(&declaration.reference, target) {
            ty = profile.wrap_box(&ty);
        }
    }
    if !field.required {
        ty = profile.wrap_optional(&ty);
    }

    output.push_str(&format!("{}pub {}: {},\n", indent, rust_name, ty));
}

fn emit_combined(
    output: &mut String,
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    declaration: &Declaration,
    supers: &[String],
) {
    if supers.is_empty() {
        output.push_str(&format!("pub struct {} {{}}\n", declaration.name));
        return;
    }

    let indent = profile.indent_str();
    output.push_str(&format!("pub struct {} {{\n", declaration.name));
    for name in supers {
        let field = match plan.lookup(name).map(|d| &d.kind) {
            Some(DeclarationKind::RequiredPartial { .. }) => "required",
            _ => "optional",
        };
        if profile.uses_serde() {
            output.push_str(&format!("{}#[serde(flatten)]\n", indent));
        }
        output.push_str(&format!("{}pub {}: {},\n", indent, field, name));
    }
    output.push_str("}\n");
}

fn type_name(profile: &RenderProfile, ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive(primitive) => profile.types.get(*primitive).to_string(),
        TypeRef::Named(target) => target.unique_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Emitter;
    use crate::compiler::compile_value;
    use crate::reference::Reference;
    use serde_json::json;

    fn render_json(value: serde_json::Value) -> String {
        let compilation = compile_value(&value).unwrap();
        let mut profile = RenderProfile::rust();
        profile.header = false;
        Emitter::new(&compilation, &profile).render().unwrap().code
    }

    #[test]
    fn test_partials_and_combined() {
        let code = render_json(json!({
            "type": "object",
            "description": "A person",
            "properties": {
                "fullName": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["fullName"]
        }));

        assert!(code.starts_with("use serde::{Deserialize, Serialize};\n\n"));
        assert!(code.contains(
            "pub struct RootOptional {\n    \
             #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    \
             pub age: Option<i64>,\n}\n"
        ));
        assert!(code.contains(
            "pub struct RootRequired {\n    \
             #[serde(rename = \"fullName\")]\n    \
             pub full_name: String,\n}\n"
        ));
        assert!(code.contains(
            "/// A person\n\
             #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n\
             pub struct Root {\n    \
             #[serde(flatten)]\n    \
             pub optional: RootOptional,\n    \
             #[serde(flatten)]\n    \
             pub required: RootRequired,\n}\n"
        ));
    }

    #[test]
    fn test_recursive_field_is_boxed() {
        let code = render_json(json!({
            "type": "object",
            "properties": {
                "value": {"type": "number"},
                "next": {"$ref": "#"}
            },
            "required": ["value"]
        }));

        assert!(code.contains("pub next: Option<Box<Root>>,\n"));
        assert!(code.contains("pub value: f64,\n"));
    }

    #[test]
    fn test_alias_and_keyword_fields() {
        let code = render_json(json!({
            "type": "object",
            "properties": {
                "type": {"$ref": "#/definitions/kind"}
            },
            "required": ["type"],
            "definitions": {"kind": {"type": "string"}}
        }));

        let kind = Reference::parse("#/definitions/kind").unwrap().unique_name();
        assert!(code.contains(&format!("pub type {} = String;\n", kind)));
        assert!(code.contains(&format!("    pub r#type: {},\n", kind)));
        assert!(!code.contains("rename = \"type\""));
    }

    #[test]
    fn test_empty_object() {
        let code = render_json(json!({"type": "object"}));
        assert!(code.ends_with("pub struct Root {}\n"));
    }

    #[test]
    fn test_header_and_custom_derives() {
        let compilation = compile_value(&json!({"type": "object"})).unwrap();
        let mut profile = RenderProfile::rust();
        profile.derives = vec!["Debug".to_string()];
        let code = Emitter::new(&compilation, &profile).render().unwrap().code;

        assert!(code.starts_with("//! Generated from JSON schema - DO NOT EDIT\n"));
        assert!(!code.contains("use serde"));
        assert!(code.contains("#[derive(Debug)]\npub struct Root {}\n"));
    }
}
