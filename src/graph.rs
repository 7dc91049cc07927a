//! Dependency Graph
//!
//! Directed petgraph graph over [`Reference`]s. An edge `from -> to` means
//! `from` needs `to` emitted first:
//! - `Contains`: a node is built from its children (`#` -> `#/properties`)
//! - `Requires`: explicit declaration dependency (Combined -> its partials)
//! - `Ref`: a `$ref` node -> its target
//!
//! `Ref` edges may close cycles (recursive schemas). Those cycles are broken
//! at emission time by naming the target before its body exists, so only the
//! other edge kinds must be acyclic.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::trace;

use crate::error::{Result, TypegenError};
use crate::reference::Reference;

/// Types of edges in the dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Structural containment (parent path -> child path)
    Contains,
    /// Hard declaration dependency
    Requires,
    /// `$ref` dependency, relaxable by forward declaration
    Ref,
}

impl EdgeKind {
    /// Whether a cycle through this edge can be broken by forward declaration
    pub fn is_relaxable(&self) -> bool {
        matches!(self, Self::Ref)
    }
}

/// The schema dependency graph
#[derive(Debug, Default)]
pub struct DependencyGraph {
    pub(crate) graph: DiGraph<Reference, EdgeKind>,

    /// Node index lookup
    node_indices: HashMap<Reference, NodeIndex>,

    /// Nodes inserted through `add_path` (not just named by a `$ref`)
    registered: HashSet<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, reference: &Reference) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(reference) {
            return idx;
        }
        let idx = self.graph.add_node(reference.clone());
        self.node_indices.insert(reference.clone(), idx);
        idx
    }

    fn add_edge_once(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == kind);
        if !exists {
            trace!(from = %self.graph[from], to = %self.graph[to], ?kind, "edge");
            self.graph.add_edge(from, to, kind);
        }
    }

    /// Insert every prefix of `reference` with containment edges between them.
    ///
    /// Idempotent.
    pub fn add_path(&mut self, reference: &Reference) {
        let mut parent = None;
        for prefix in reference.path() {
            let idx = self.node(&prefix);
            self.registered.insert(idx);
            if let Some(parent) = parent {
                self.add_edge_once(parent, idx, EdgeKind::Contains);
            }
            parent = Some(idx);
        }
    }

    /// Record that `from` must be emitted after `to`
    pub fn add_dependency_edge(&mut self, from: &Reference, to: &Reference) {
        let (from, to) = (self.node(from), self.node(to));
        self.add_edge_once(from, to, EdgeKind::Requires);
    }

    /// Record a `$ref` from `from` to `to`.
    ///
    /// `to` may not be registered yet (forward reference).
    pub fn add_reference_edge(&mut self, from: &Reference, to: &Reference) {
        let (from, to) = (self.node(from), self.node(to));
        self.add_edge_once(from, to, EdgeKind::Ref);
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.node_indices.contains_key(reference)
    }

    /// Whether the node was inserted by `add_path`
    pub fn is_registered(&self, reference: &Reference) -> bool {
        self.node_indices
            .get(reference)
            .is_some_and(|idx| self.registered.contains(idx))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All references in insertion order
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.graph.node_weights()
    }

    /// Immediate dependencies of `reference`
    pub fn refs_out(&self, reference: &Reference) -> Vec<(&Reference, EdgeKind)> {
        self.neighbors(reference, Direction::Outgoing)
    }

    /// Immediate dependents of `reference`
    pub fn refs_in(&self, reference: &Reference) -> Vec<(&Reference, EdgeKind)> {
        self.neighbors(reference, Direction::Incoming)
    }

    fn neighbors(&self, reference: &Reference, direction: Direction) -> Vec<(&Reference, EdgeKind)> {
        let Some(&idx) = self.node_indices.get(reference) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(NodeIndex, EdgeKind)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (other, *e.weight())
            })
            .collect();
        neighbors.sort_by_key(|(other, _)| other.index());
        neighbors
            .into_iter()
            .map(|(other, kind)| (&self.graph[other], kind))
            .collect()
    }

    /// `$ref` edges as (source, target) pairs
    pub fn reference_edges(&self) -> Vec<(&Reference, &Reference)> {
        self.graph
            .edge_references()
            .filter(|e| *e.weight() == EdgeKind::Ref)
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
            .collect()
    }

    /// Strongly connected components, dependencies first
    pub fn components(&self) -> Vec<Vec<Reference>> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .map(|mut members| {
                members.sort_by_key(|idx| idx.index());
                members.into_iter().map(|idx| self.graph[idx].clone()).collect()
            })
            .collect()
    }

    /// Dependencies-first order of every reference.
    ///
    /// Components are released by Kahn's algorithm over the condensed graph,
    /// ties broken by insertion order. Inside a component only non-`$ref`
    /// edges are honoured; a cycle among them is `CycleDetected`.
    pub fn topological_order(&self) -> Result<Vec<Reference>> {
        let sccs = kosaraju_scc(&self.graph);

        let mut component_of = vec![0usize; self.graph.node_count()];
        for (id, members) in sccs.iter().enumerate() {
            for idx in members {
                component_of[idx.index()] = id;
            }
        }

        let mut unmet = vec![0usize; sccs.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); sccs.len()];
        let mut seen = HashSet::new();
        for edge in self.graph.edge_references() {
            let from = component_of[edge.source().index()];
            let to = component_of[edge.target().index()];
            if from != to && seen.insert((from, to)) {
                unmet[from] += 1;
                dependents[to].push(from);
            }
        }

        let first_index = |id: usize| {
            sccs[id]
                .iter()
                .map(|idx| idx.index())
                .min()
                .unwrap_or_default()
        };

        let mut ready: BinaryHeap<Reverse<(usize, usize)>> = (0..sccs.len())
            .filter(|&id| unmet[id] == 0)
            .map(|id| Reverse((first_index(id), id)))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse((_, id))) = ready.pop() {
            for idx in self.order_component(&sccs[id])? {
                order.push(self.graph[idx].clone());
            }
            for &dependent in &dependents[id] {
                unmet[dependent] -= 1;
                if unmet[dependent] == 0 {
                    ready.push(Reverse((first_index(dependent), dependent)));
                }
            }
        }

        Ok(order)
    }

    /// Order one component's members over its non-relaxable edges
    fn order_component(&self, members: &[NodeIndex]) -> Result<Vec<NodeIndex>> {
        let member_set: HashSet<NodeIndex> = members.iter().copied().collect();

        let mut unmet: HashMap<NodeIndex, usize> = members.iter().map(|&idx| (idx, 0)).collect();
        let mut dependents: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        for &idx in members {
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                if edge.weight().is_relaxable() || !member_set.contains(&edge.target()) {
                    continue;
                }
                if edge.target() == idx {
                    return Err(self.cycle_at(idx));
                }
                *unmet.entry(idx).or_default() += 1;
                dependents.entry(edge.target()).or_default().push(idx);
            }
        }

        if members.len() == 1 {
            return Ok(members.to_vec());
        }

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = members
            .iter()
            .filter(|idx| unmet[*idx] == 0)
            .map(|&idx| Reverse(idx))
            .collect();

        let mut ordered = Vec::with_capacity(members.len());
        while let Some(Reverse(idx)) = ready.pop() {
            ordered.push(idx);
            for &dependent in dependents.get(&idx).into_iter().flatten() {
                if let Some(count) = unmet.get_mut(&dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(Reverse(dependent));
                    }
                }
            }
        }

        if ordered.len() < members.len() {
            let stuck = members
                .iter()
                .copied()
                .filter(|idx| !ordered.contains(idx))
                .min()
                .unwrap_or(members[0]);
            return Err(self.cycle_at(stuck));
        }
        Ok(ordered)
    }

    fn cycle_at(&self, idx: NodeIndex) -> TypegenError {
        TypegenError::CycleDetected {
            reference: self.graph[idx].to_pointer(),
        }
    }

    /// Export the dependency graph to GraphViz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph DependencyGraph {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        for idx in self.graph.node_indices() {
            let reference = &self.graph[idx];
            let style = if self.registered.contains(&idx) {
                ""
            } else {
                ", style=\"dashed\""
            };
            output.push_str(&format!(
                "  n{} [label=\"{}\"{}];\n",
                idx.index(),
                escape_label(&reference.to_pointer()),
                style
            ));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            let attrs = match edge.weight() {
                EdgeKind::Contains => "",
                EdgeKind::Requires => " [style=\"bold\"]",
                EdgeKind::Ref => " [style=\"dashed\", label=\"$ref\"]",
            };
            output.push_str(&format!(
                "  n{} -> n{}{};\n",
                edge.source().index(),
                edge.target().index(),
                attrs
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
