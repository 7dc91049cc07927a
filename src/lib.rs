//! Schema Typegen
//!
//! Compiles a JSON Schema document into static type declarations for a
//! target language (Python `TypedDict`s or Rust serde structs).
//!
//! ## Pipeline
//!
//! ```text
//! document ──▶ SchemaNode ──▶ SchemaCompiler ──▶ Compilation ──▶ Emitter ──▶ text
//!                               │                  ├─ declarations
//!                               │                  ├─ dependency graph
//!                               └─ diagnostics     └─ emission order
//! ```
//!
//! - Every object yields an optional partial, a required partial and a
//!   Combined declaration merging both; empty partials are skipped.
//! - Every node is named by its path from the root (`Reference`), hashed
//!   into a deterministic, collision-checked identifier.
//! - `$ref`s are resolved by name, never inlined, so recursive schemas
//!   compile; the emitter orders dependencies first and forward-declares
//!   whatever sits on a reference cycle.
//!
//! ## Example
//!
//! ```
//! use schema_typegen::{compile_value, Emitter, RenderProfile};
//! use serde_json::json;
//!
//! let compilation = compile_value(&json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}},
//!     "required": ["name"]
//! }))?;
//! let output = Emitter::new(&compilation, &RenderProfile::python()).render()?;
//! assert!(output.code.contains("class RootRequired(TypedDict, total=True):"));
//! # Ok::<(), schema_typegen::TypegenError>(())
//! ```

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod declaration;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod loader;
pub mod primitive;
pub mod reference;
pub mod schema;

pub use codegen::{Emitter, GeneratedOutput, RenderProfile, Target, TypeMappings};
pub use compiler::{compile, compile_value, Compilation, SchemaCompiler};
pub use config::TypegenConfig;
pub use declaration::{Declaration, DeclarationKind, Field, TypeRef};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use error::{Result, TypegenError};
pub use graph::{DependencyGraph, EdgeKind};
pub use primitive::{resolve_type, Primitive, Resolution};
pub use reference::Reference;
pub use schema::SchemaNode;

/// Compile `root` and render it with `profile`
pub fn generate(root: &SchemaNode, profile: &RenderProfile) -> Result<GeneratedOutput> {
    let compilation = compile(root)?;
    Emitter::new(&compilation, profile).render()
}
