//! Schema Compiler
//!
//! Walks the schema tree and produces one [`Declaration`] set plus the
//! finalized [`DependencyGraph`]:
//! - object nodes yield an optional partial, a required partial (each only
//!   when non-empty) and a Combined declaration merging them
//! - primitives under `definitions` yield an Alias, elsewhere they inline
//! - `$ref` nodes resolve to the target's unique name immediately; the
//!   target body is never inlined, so recursive schemas terminate
//!
//! Compilation is all-or-nothing: every `$ref` is checked and the emission
//! order is computed before a [`Compilation`] is returned.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::declaration::{Declaration, DeclarationKind, Field, TypeRef};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TypegenError};
use crate::graph::{DependencyGraph, EdgeKind};
use crate::primitive::{resolve_type, Resolution};
use crate::reference::Reference;
use crate::schema::SchemaNode;

/// Where a node sits in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Root or property schema
    Inline,
    /// Directly under a `definitions` map
    Definition,
}

/// A `$ref` awaiting resolution
#[derive(Debug, Clone)]
struct PendingRef {
    source: Reference,
    target: Reference,
}

// =============================================================================
// Compilation
// =============================================================================

/// Result of compiling one schema document. Immutable.
#[derive(Debug)]
pub struct Compilation {
    declarations: Vec<Declaration>,
    graph: DependencyGraph,
    order: Vec<Reference>,
    diagnostics: Diagnostics,
}

impl Compilation {
    /// Declarations in creation order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Dependencies-first order of every graph node
    pub fn order(&self) -> &[Reference] {
        &self.order
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Look up a declaration by generated name
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Declarations owned by `reference`, in creation order
    pub fn declarations_at(&self, reference: &Reference) -> impl Iterator<Item = &Declaration> {
        let reference = reference.clone();
        self.declarations.iter().filter(move |d| d.reference == reference)
    }

    /// Declarations in emission order: the graph order restricted to
    /// references owning a declaration, creation order within a reference
    pub fn ordered_declarations(&self) -> Vec<&Declaration> {
        let mut by_reference: HashMap<&Reference, Vec<&Declaration>> = HashMap::new();
        for declaration in &self.declarations {
            by_reference
                .entry(&declaration.reference)
                .or_default()
                .push(declaration);
        }
        self.order
            .iter()
            .filter_map(|reference| by_reference.remove(reference))
            .flatten()
            .collect()
    }
}

// =============================================================================
// Compiler
// =============================================================================

/// Recursive schema compiler. One instance per document.
#[derive(Debug, Default)]
pub struct SchemaCompiler {
    graph: DependencyGraph,
    declarations: Vec<Declaration>,

    /// Resolved type for every compiled node
    resolved: HashMap<Reference, TypeRef>,

    /// Generated name -> reference that claimed it
    names: HashMap<String, Reference>,

    /// References whose unique name is bound by a Combined/Alias declaration
    declared: HashSet<Reference>,

    pending_refs: Vec<PendingRef>,
    definitions: Vec<Reference>,
    diagnostics: Diagnostics,
}

impl SchemaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a root schema
    pub fn compile(root: &SchemaNode) -> Result<Compilation> {
        let mut compiler = Self::new();
        compiler.add_type(&Reference::root(), root, Context::Inline)?;
        compiler.finish()
    }

    /// Compile the node at `reference`, returning its resolved type
    fn add_type(&mut self, reference: &Reference, node: &SchemaNode, context: Context) -> Result<TypeRef> {
        self.graph.add_path(reference);
        self.claim_name(reference.unique_name(), reference)?;
        debug!(reference = %reference, ?context, "compiling node");

        if node.has_composition() {
            self.diagnostics.composition_ignored(reference);
        }

        let resolved = if let Some(raw) = &node.reference {
            self.add_reference(reference, node, raw, context)?
        } else if let Some(keyword) = &node.schema_type {
            match resolve_type(reference, keyword)? {
                Resolution::Primitive(primitive) => {
                    let ty = TypeRef::Primitive(primitive);
                    match context {
                        Context::Definition => self.bind_alias(reference, ty, node)?,
                        Context::Inline => ty,
                    }
                }
                Resolution::NotApplicable => self.add_object(reference, node)?,
            }
        } else if node.properties.is_some() {
            self.add_object(reference, node)?
        } else {
            return Err(TypegenError::MalformedNode {
                reference: reference.to_pointer(),
            });
        };

        self.resolved.insert(reference.clone(), resolved.clone());
        Ok(resolved)
    }

    fn add_reference(
        &mut self,
        reference: &Reference,
        node: &SchemaNode,
        raw: &str,
        context: Context,
    ) -> Result<TypeRef> {
        if node.schema_type.is_some() || node.properties.is_some() {
            self.diagnostics.ref_siblings_ignored(reference);
        }

        let target = Reference::parse(raw).ok_or_else(|| TypegenError::UnresolvedReference {
            reference: reference.to_pointer(),
            target: raw.to_string(),
        })?;

        self.graph.add_reference_edge(reference, &target);
        self.pending_refs.push(PendingRef {
            source: reference.clone(),
            target: target.clone(),
        });

        // A `$ref` root commonly carries the definitions it points into
        self.add_definitions(reference, node)?;

        let ty = TypeRef::Named(target);
        match context {
            Context::Definition => self.bind_alias(reference, ty, node),
            Context::Inline => Ok(ty),
        }
    }

    fn bind_alias(&mut self, reference: &Reference, target: TypeRef, node: &SchemaNode) -> Result<TypeRef> {
        self.push(Declaration::alias(
            reference.clone(),
            target,
            node.description.clone(),
        ));
        Ok(TypeRef::Named(reference.clone()))
    }

    fn add_object(&mut self, reference: &Reference, node: &SchemaNode) -> Result<TypeRef> {
        let empty = Default::default();
        let properties = node.properties.as_ref().unwrap_or(&empty);

        for key in node.required_keys() {
            if !properties.contains_key(key) {
                self.diagnostics.unknown_required(reference, key);
            }
        }

        let (required, optional): (Vec<_>, Vec<_>) = properties
            .iter()
            .partition(|(name, _)| node.is_required(name));

        let properties_ref = reference + "properties";
        let mut supers = Vec::new();

        for (required_class, members) in [(false, optional), (true, required)] {
            if members.is_empty() {
                continue;
            }
            self.graph.add_path(&properties_ref);
            self.claim_name(properties_ref.unique_name(), &properties_ref)?;

            let mut fields = Vec::with_capacity(members.len());
            for (name, schema) in members {
                let ty = self.add_type(&(&properties_ref + name.as_str()), schema, Context::Inline)?;
                fields.push(Field {
                    name: name.clone(),
                    ty,
                    required: required_class,
                });
            }

            let suffix = if required_class { "Required" } else { "Optional" };
            let name = format!("{}{}", reference.unique_name(), suffix);
            self.claim_name(name.clone(), &properties_ref)?;
            self.push(Declaration::partial(
                properties_ref.clone(),
                name.clone(),
                required_class,
                fields,
            ));
            supers.push(name);
        }

        self.add_definitions(reference, node)?;

        if !supers.is_empty() {
            self.graph.add_dependency_edge(reference, &properties_ref);
        }
        self.push(Declaration::combined(
            reference.clone(),
            supers,
            node.description.clone(),
        ));
        Ok(TypeRef::Named(reference.clone()))
    }

    /// Compile `definitions` entries; they are not supers of `reference`
    fn add_definitions(&mut self, reference: &Reference, node: &SchemaNode) -> Result<()> {
        let Some(definitions) = &node.definitions else {
            return Ok(());
        };
        let definitions_ref = reference + "definitions";
        self.graph.add_path(&definitions_ref);
        for (key, schema) in definitions {
            let definition_ref = &definitions_ref + key.as_str();
            self.definitions.push(definition_ref.clone());
            self.add_type(&definition_ref, schema, Context::Definition)?;
        }
        Ok(())
    }

    fn push(&mut self, declaration: Declaration) {
        debug!(
            name = %declaration.name,
            kind = declaration.kind.label(),
            reference = %declaration.reference,
            "declaration"
        );
        if declaration.is_identity() {
            self.declared.insert(declaration.reference.clone());
        }
        self.declarations.push(declaration);
    }

    /// Reserve a generated name for `reference`.
    ///
    /// Re-claiming by the same reference is a no-op.
    fn claim_name(&mut self, name: String, reference: &Reference) -> Result<()> {
        match self.names.get(&name) {
            Some(owner) if owner != reference => Err(TypegenError::NameCollision {
                name,
                first: owner.to_pointer(),
                second: reference.to_pointer(),
            }),
            Some(_) => Ok(()),
            None => {
                self.names.insert(name, reference.clone());
                Ok(())
            }
        }
    }

    /// Resolve pending `$ref`s, validate the graph and freeze the result
    fn finish(mut self) -> Result<Compilation> {
        let pending = std::mem::take(&mut self.pending_refs);

        for PendingRef { source, target } in &pending {
            if !self.graph.is_registered(target) || !self.resolved.contains_key(target) {
                return Err(TypegenError::UnresolvedReference {
                    reference: source.to_pointer(),
                    target: target.to_pointer(),
                });
            }
        }

        // A target compiled inline (primitive or another $ref) still needs
        // its unique name bound to something
        for PendingRef { target, .. } in &pending {
            if self.declared.contains(target) {
                continue;
            }
            let resolved = self.resolved[target].clone();
            self.claim_name(target.unique_name(), target)?;
            self.push(Declaration::alias(target.clone(), resolved, None));
        }

        self.check_alias_chains()?;

        for definition in std::mem::take(&mut self.definitions) {
            let referenced = self
                .graph
                .refs_in(&definition)
                .iter()
                .any(|(_, kind)| *kind == EdgeKind::Ref);
            if !referenced {
                self.diagnostics.unused_definition(&definition);
            }
        }

        let order = self.graph.topological_order()?;
        debug!(
            declarations = self.declarations.len(),
            nodes = self.graph.node_count(),
            "compilation finished"
        );

        Ok(Compilation {
            declarations: self.declarations,
            graph: self.graph,
            order,
            diagnostics: self.diagnostics,
        })
    }

    /// Aliases that only ever point at other aliases never reach a type
    fn check_alias_chains(&self) -> Result<()> {
        let aliases: HashMap<&Reference, &Reference> = self
            .declarations
            .iter()
            .filter_map(|d| match &d.kind {
                DeclarationKind::Alias {
                    target: TypeRef::Named(target),
                } => Some((&d.reference, target)),
                _ => None,
            })
            .collect();

        for &start in aliases.keys() {
            let mut seen = HashSet::from([start]);
            let mut current = start;
            while let Some(&next) = aliases.get(current) {
                if !seen.insert(next) {
                    return Err(TypegenError::CycleDetected {
                        reference: start.to_pointer(),
                    });
                }
                current = next;
            }
        }
        Ok(())
    }
}

/// Compile a parsed schema document
pub fn compile(root: &SchemaNode) -> Result<Compilation> {
    SchemaCompiler::compile(root)
}

/// Compile an in-memory JSON tree
pub fn compile_value(value: &serde_json::Value) -> Result<Compilation> {
    let root = SchemaNode::from_value(value)?;
    compile(&root)
}
