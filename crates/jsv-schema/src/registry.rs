//! # Schema Registry
//!
//! Append-only arena of [`SchemaNode`]s plus a canonical-URI index.
//!
//! ## Invariants
//!
//! - Indices are stable: nodes are never reordered or removed.
//! - One node per canonical URI. [`Registry::add`] is insert-or-lookup, so a
//!   document reached both directly and through `$ref` compiles to a single
//!   node.
//! - After construction the only mutation is [`Registry::link_references`]
//!   filling unresolved `$ref` targets, which needs `&self` only.

use std::collections::HashMap;

use jsv_core::RefTarget;

use crate::schema::{NodeIndex, SchemaNode};

/// Index-addressed store of compiled schemas.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: Vec<SchemaNode>,
    by_uri: HashMap<String, NodeIndex>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node under its URI, or return the node already stored there.
    pub fn add(&mut self, node: SchemaNode) -> NodeIndex {
        if let Some(&index) = self.by_uri.get(node.uri()) {
            return index;
        }
        let index = NodeIndex(self.nodes.len());
        self.by_uri.insert(node.uri().to_string(), index);
        self.nodes.push(node);
        index
    }

    /// The node at `index`.
    ///
    /// Indices are only minted by this registry, so every index held by a
    /// compiled node or returned from [`Registry::add`] is in bounds.
    pub fn get(&self, index: NodeIndex) -> &SchemaNode {
        &self.nodes[index.0]
    }

    /// The node registered under a canonical URI.
    pub fn lookup(&self, uri: &str) -> Option<NodeIndex> {
        self.by_uri.get(uri).copied()
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &SchemaNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Link every unresolved `$ref` whose target URI is now registered.
    ///
    /// Scans nodes in insertion order and returns the targets that are
    /// still missing, in that order. Repeated targets are reported once per
    /// referring node.
    pub fn link_references(&self) -> Vec<RefTarget> {
        let mut unresolved = Vec::new();
        for node in &self.nodes {
            let Some(reference) = node.reference() else {
                continue;
            };
            if reference.resolved().is_some() {
                continue;
            }
            match self.lookup(&reference.target().key()) {
                Some(index) => {
                    reference.resolve(index);
                }
                None => unresolved.push(reference.target().clone()),
            }
        }
        unresolved
    }
}
