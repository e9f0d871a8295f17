//! # Schema Graph Nodes
//!
//! The compiled form of one raw schema. A node is either a boolean schema
//! or a set of independently optional keyword facets. Absence of a facet
//! means "no constraint", never "constraint is false".
//!
//! ## Arena Ownership
//!
//! Nodes never own other nodes. Every child is a [`NodeIndex`] into the
//! owning [`Registry`](crate::Registry), which lets sub-schemas be shared
//! and lets `$ref` form cycles (`{ "$ref": "#" }`).
//!
//! ## Resolve-Once References
//!
//! The `$ref` facet is the only state that changes after a node is built.
//! Its target index lives in a `OnceLock`, filled by the resolution loop and
//! never reassigned.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use jsv_core::{JsonType, RefTarget};
use regex::Regex;
use serde_json::Value;

/// Index of a node in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// The raw arena position.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// A compiled schema.
#[derive(Debug)]
pub struct SchemaNode {
    uri: String,
    kind: SchemaKind,
}

impl SchemaNode {
    /// Create a node identified by its canonical URI.
    pub fn new(uri: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            uri: uri.into(),
            kind,
        }
    }

    /// Canonical URI: the document base plus the pointer to this schema.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Boolean or keyword form.
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// The `$ref` facet, if this is a keyword schema carrying one.
    pub fn reference(&self) -> Option<&Reference> {
        match &self.kind {
            SchemaKind::Keywords(keywords) => keywords.reference.as_ref(),
            SchemaKind::Bool(_) => None,
        }
    }
}

/// The two shapes a schema can take.
#[derive(Debug)]
pub enum SchemaKind {
    /// `true` accepts everything, `false` rejects everything.
    Bool(bool),
    /// Zero or more keyword facets.
    Keywords(Box<Keywords>),
}

/// A `$ref` facet: where it points and, once linked, the node it names.
#[derive(Debug)]
pub struct Reference {
    target: RefTarget,
    resolved: OnceLock<NodeIndex>,
}

impl Reference {
    /// An unresolved reference.
    pub fn new(target: RefTarget) -> Self {
        Self {
            target,
            resolved: OnceLock::new(),
        }
    }

    /// The absolute target: document base plus pointer.
    pub fn target(&self) -> &RefTarget {
        &self.target
    }

    /// The linked node, or `None` while unresolved.
    pub fn resolved(&self) -> Option<NodeIndex> {
        self.resolved.get().copied()
    }

    /// Link this reference. Returns `false` if it was already linked, in
    /// which case the original link is kept.
    pub(crate) fn resolve(&self, index: NodeIndex) -> bool {
        self.resolved.set(index).is_ok()
    }
}

/// The two forms of `items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items {
    /// One schema applied to every element.
    Single(NodeIndex),
    /// Schemas applied positionally; extra elements fall to `additionalItems`.
    Positional(Vec<NodeIndex>),
}

/// One `patternProperties` entry. The regex keeps the original pattern text.
#[derive(Debug, Clone)]
pub struct PatternProperty {
    pub regex: Regex,
    pub schema: NodeIndex,
}

/// One `dependencies` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// The whole object must also satisfy this schema.
    Schema(NodeIndex),
    /// The object must also have these properties.
    Required(Vec<String>),
}

/// Keyword facets of an object schema.
#[derive(Debug, Default)]
pub struct Keywords {
    // Core and applicators.
    pub reference: Option<Reference>,
    pub types: Option<Vec<JsonType>>,
    pub constant: Option<Value>,
    pub enumeration: Option<Vec<Value>>,
    pub not: Option<NodeIndex>,
    pub if_: Option<NodeIndex>,
    pub then: Option<NodeIndex>,
    pub else_: Option<NodeIndex>,
    pub all_of: Option<Vec<NodeIndex>>,
    pub any_of: Option<Vec<NodeIndex>>,
    pub one_of: Option<Vec<NodeIndex>>,

    // Numbers.
    pub multiple_of: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,

    // Strings. Lengths count Unicode code points.
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub pattern: Option<Regex>,

    // Arrays.
    pub items: Option<Items>,
    pub additional_items: Option<NodeIndex>,
    pub max_items: Option<usize>,
    pub min_items: Option<usize>,
    pub unique_items: bool,
    pub contains: Option<NodeIndex>,

    // Objects.
    pub max_properties: Option<usize>,
    pub min_properties: Option<usize>,
    pub required: Option<Vec<String>>,
    pub properties: Option<HashMap<String, NodeIndex>>,
    /// Declaration order; a key may match several patterns.
    pub pattern_properties: Option<Vec<PatternProperty>>,
    pub additional_properties: Option<NodeIndex>,
    /// Declaration order.
    pub dependencies: Option<Vec<(String, Dependency)>>,
    pub property_names: Option<NodeIndex>,
}
