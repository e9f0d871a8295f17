//! # Cross-Document Resolution
//!
//! Builds one [`Registry`] from several independently supplied documents.
//!
//! Every document is compiled as a root first. Then link passes run until
//! every `$ref` is bound: a target whose base names a supplied document but
//! whose location was never compiled (for example `other.json#/definitions/a`
//! when `other.json` has no `$ref` of its own into `definitions`) is looked
//! up in that document's raw value and compiled on demand. The new node is
//! linked on the following pass.
//!
//! A target whose base names no supplied document, or whose pointer
//! addresses nothing in a supplied document, is undefined. Passes continue
//! while they still compile something new, so a missing document reachable
//! only through an on-demand sub-schema is reported too. Once a pass makes
//! no progress, any undefined targets fail construction with
//! [`SchemaError::UnresolvedReferences`].
//!
//! Each base URI belongs to one document. Supplying the same document twice
//! is harmless, but two different documents under one base (two documents
//! without `$id`, or two declaring the same `$id`) are rejected, since their
//! sub-schemas would share canonical URIs.

use std::collections::{HashMap, HashSet};

use jsv_core::{json_equal, RefTarget, SchemaError};
use serde_json::Value;

use crate::compiler::{CompiledRoot, Compiler};
use crate::registry::Registry;

/// A fully linked registry plus the roots it was built from, in input
/// order.
#[derive(Debug)]
pub struct CompiledSchemas {
    pub registry: Registry,
    pub roots: Vec<CompiledRoot>,
}

/// Compile and cross-link a set of schema documents.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] if any document, or any on-demand
/// sub-schema, is ill-shaped, and [`SchemaError::UnresolvedReferences`] if
/// some `$ref` cannot be bound to a supplied document.
pub fn compile_documents(documents: &[Value]) -> Result<CompiledSchemas, SchemaError> {
    let mut registry = Registry::new();
    let mut roots = Vec::with_capacity(documents.len());
    let mut raw: HashMap<String, &Value> = HashMap::new();

    for document in documents {
        let root = Compiler::compile_root(&mut registry, document)?;
        tracing::debug!(uri = %root.base, nodes = registry.len(), "compiled schema document");
        let base = root.base.as_str();
        match raw.get(base) {
            Some(&owner) if !json_equal(owner, document) => {
                tracing::warn!(uri = %base, "two different documents share one base URI");
                return Err(SchemaError::Malformed {
                    location: format!("{base}#"),
                    reason: "duplicate document URI with different content".to_string(),
                });
            }
            Some(_) => {}
            None => {
                raw.insert(base.to_string(), document);
            }
        }
        roots.push(root);
    }

    let mut undefined: Vec<String> = Vec::new();
    let mut attempted: HashSet<String> = HashSet::new();
    let mut pass = 0usize;
    loop {
        let unresolved = registry.link_references();
        pass += 1;
        tracing::debug!(pass, unresolved = unresolved.len(), "linked schema references");
        if unresolved.is_empty() {
            break;
        }

        let mut progressed = false;
        for target in unresolved {
            let key = target.key();
            if !attempted.insert(key.clone()) {
                continue;
            }
            match locate(&raw, &target) {
                Locate::Found(schema) => {
                    tracing::trace!(uri = %key, "compiling referenced sub-schema");
                    Compiler::compile_sub(
                        &mut registry,
                        target.base().clone(),
                        target.pointer().clone(),
                        schema,
                    )?;
                    progressed = true;
                }
                Locate::NoDocument => push_unique(&mut undefined, target.base().as_str()),
                Locate::NoLocation => push_unique(&mut undefined, &key),
            }
        }
        if !progressed {
            break;
        }
    }

    if !undefined.is_empty() {
        tracing::warn!(uris = ?undefined, "unresolvable schema references");
        return Err(SchemaError::UnresolvedReferences { uris: undefined });
    }
    Ok(CompiledSchemas { registry, roots })
}

enum Locate<'v> {
    Found(&'v Value),
    NoDocument,
    NoLocation,
}

fn locate<'v>(raw: &HashMap<String, &'v Value>, target: &RefTarget) -> Locate<'v> {
    match raw.get(target.base().as_str()) {
        None => Locate::NoDocument,
        Some(&document) => match target.pointer().evaluate(document) {
            Some(schema) => Locate::Found(schema),
            None => Locate::NoLocation,
        },
    }
}

fn push_unique(uris: &mut Vec<String>, uri: &str) {
    if !uris.iter().any(|u| u == uri) {
        uris.push(uri.to_string());
    }
}
