//! Python Code Emitter
//!
//! Renders declarations as `typing.TypedDict` classes:
//! - partials become `total=False` / `total=True` classes, falling back to
//!   the functional `TypedDict("Name", {...})` form when a key is not a
//!   valid identifier
//! - Combined declarations inherit their partials
//! - aliases are module-level bindings; names not yet defined are quoted

use std::collections::BTreeSet;

use super::names::{is_python_identifier, python_string_literal};
use super::{doc_lines, EmitPlan, RenderProfile};
use crate::declaration::{Declaration, DeclarationKind, Field, TypeRef};

/// `typing` generics a primitive mapping may use
const TYPING_GENERICS: [&str; 4] = ["Any", "Literal", "Optional", "Union"];

/// Render every declaration in the plan
pub fn render(plan: &EmitPlan<'_>, profile: &RenderProfile) -> String {
    let mut imports = BTreeSet::new();
    let mut blocks = Vec::new();

    for (at, declaration) in plan.declarations().iter().enumerate() {
        blocks.push(emit_declaration(plan, profile, at, declaration, &mut imports));
    }

    let body = blocks.join("\n\n");

    let mut output = String::new();
    if profile.header {
        output.push_str("# Generated by schema-typegen - DO NOT EDIT\n\n");
    }
    if !imports.is_empty() {
        let names: Vec<&str> = imports.into_iter().collect();
        output.push_str(&format!("from typing import {}\n", names.join(", ")));
    }
    if !body.is_empty() {
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&body);
    }
    output
}

fn emit_declaration(
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    at: usize,
    declaration: &Declaration,
    imports: &mut BTreeSet<&'static str>,
) -> String {
    let indent = profile.indent_str();
    match &declaration.kind {
        DeclarationKind::RequiredPartial { fields } | DeclarationKind::OptionalPartial { fields } => {
            imports.insert("TypedDict");
            let total = matches!(declaration.kind, DeclarationKind::RequiredPartial { .. });
            if fields.iter().all(|f| is_python_identifier(&f.name)) {
                emit_class(plan, profile, at, declaration, fields, total, imports)
            } else {
                emit_functional(plan, profile, at, declaration, fields, total, imports)
            }
        }
        DeclarationKind::Combined { supers } => {
            let bases = if supers.is_empty() {
                imports.insert("TypedDict");
                "TypedDict".to_string()
            } else {
                supers.join(", ")
            };
            let mut output = format!("class {}({}):\n", declaration.name, bases);
            match &declaration.description {
                Some(description) => output.push_str(&docstring(description, &indent)),
                None => output.push_str(&format!("{}pass\n", indent)),
            }
            output
        }
        DeclarationKind::Alias { target } => {
            let mut output = String::new();
            if let Some(description) = &declaration.description {
                for line in doc_lines(description) {
                    output.push_str(&format!("# {}\n", line).replace("# \n", "#\n"));
                }
            }
            let forward = matches!(target, TypeRef::Named(t) if plan.is_forward(at, t));
            let annotation = type_annotation(plan, profile, at, target, imports);
            if forward {
                imports.insert("TypeAlias");
                output.push_str(&format!("{}: TypeAlias = {}\n", declaration.name, annotation));
            } else {
                output.push_str(&format!("{} = {}\n", declaration.name, annotation));
            }
            output
        }
    }
}

fn emit_class(
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    at: usize,
    declaration: &Declaration,
    fields: &[Field],
    total: bool,
    imports: &mut BTreeSet<&'static str>,
) -> String {
    let indent = profile.indent_str();
    let mut output = format!(
        "class {}(TypedDict, total={}):\n",
        declaration.name,
        if total { "True" } else { "False" }
    );
    for field in fields {
        output.push_str(&format!(
            "{}{}: {}\n",
            indent,
            field.name,
            type_annotation(plan, profile, at, &field.ty, imports)
        ));
    }
    output
}

fn emit_functional(
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    at: usize,
    declaration: &Declaration,
    fields: &[Field],
    total: bool,
    imports: &mut BTreeSet<&'static str>,
) -> String {
    let indent = profile.indent_str();
    let mut output = format!("{} = TypedDict(\n", declaration.name);
    output.push_str(&format!("{}{},\n", indent, python_string_literal(&declaration.name)));
    output.push_str(&format!("{}{{\n", indent));
    for field in fields {
        output.push_str(&format!(
            "{}{}{}: {},\n",
            indent,
            indent,
            python_string_literal(&field.name),
            type_annotation(plan, profile, at, &field.ty, imports)
        ));
    }
    output.push_str(&format!("{}}},\n", indent));
    output.push_str(&format!("{}total={},\n", indent, if total { "True" } else { "False" }));
    output.push_str(")\n");
    output
}

/// Annotation for a type used by the declaration at position `at`.
///
/// Records the `typing` generics a primitive mapping pulls in.
fn type_annotation(
    plan: &EmitPlan<'_>,
    profile: &RenderProfile,
    at: usize,
    ty: &TypeRef,
    imports: &mut BTreeSet<&'static str>,
) -> String {
    match ty {
        TypeRef::Primitive(primitive) => {
            let mapped = profile.types.get(*primitive);
            for name in TYPING_GENERICS {
                if mapped.contains(&format!("{}[", name)) {
                    imports.insert(name);
                }
            }
            mapped.to_string()
        }
        TypeRef::Named(target) if plan.is_forward(at, target) => {
            format!("\"{}\"", target.unique_name())
        }
        TypeRef::Named(target) => target.unique_name(),
    }
}

fn docstring(description: &str, indent: &str) -> String {
    // A quote right before the closing `"""` would end the literal early
    let text = description.trim().replace('\\', "\\\\");
    let stem = text.trim_end_matches('"');
    let escaped = format!(
        "{}{}",
        stem.replace("\"\"\"", "\\\"\\\"\\\""),
        "\\\"".repeat(text.len() - stem.len())
    );
    if escaped.contains('\n') {
        let mut output = format!("{}\"\"\"", indent);
        for (i, line) in escaped.lines().enumerate() {
            if i > 0 && !line.trim().is_empty() {
                output.push_str(indent);
            }
            output.push_str(line.trim_end());
            output.push('\n');
        }
        output.push_str(&format!("{}\"\"\"\n", indent));
        output
    } else {
        format!("{}\"\"\"{}\"\"\"\n", indent, escaped)
    }
}
