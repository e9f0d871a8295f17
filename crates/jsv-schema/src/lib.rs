//! # jsv-schema — Schema Compilation & Validation
//!
//! Compiles JSON Schema documents (draft-7 style) into an indexed graph and
//! validates JSON instances against it, reporting every violation with its
//! location in both the instance and the schema.
//!
//! ## Build Phase
//!
//! [`Validator::new`] takes an ordered list of raw documents:
//!
//! - [`compiler`] turns each document into [`SchemaNode`]s stored in the
//!   [`Registry`] arena, keyed by canonical URI (`base#pointer`).
//! - [`resolve`] links every `$ref` to its target node, compiling targets
//!   inside sibling documents on demand, and fails with
//!   [`SchemaError::UnresolvedReferences`] if anything is left over.
//!
//! Construction either yields a fully linked, immutable registry or fails.
//! A malformed schema is never partially accepted.
//!
//! ## Evaluation Phase
//!
//! [`Validator::validate`] walks the graph against an instance. Failed
//! keywords are reported in the returned [`ValidationResult`]; only a
//! `$ref` chain deeper than [`ValidatorConfig::max_stack_depth`] is an
//! error ([`EvaluationError::StackOverflow`]).
//!
//! ```
//! use jsv_schema::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::new(&[json!({"type": "integer"})]).unwrap();
//! let result = validator.validate(&json!(3.14)).unwrap();
//! assert_eq!(result.errors()[0].to_string(), "(root) violates #/type");
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `jsv-core` internally.
//! - The registry is append-only during construction and read-only after.
//! - No `unsafe` code.

pub mod compiler;
pub mod config;
pub mod registry;
pub mod resolve;
pub mod result;
pub mod schema;
pub mod stack;
pub mod validator;
mod vm;

pub use compiler::{CompiledRoot, Compiler};
pub use config::{ValidatorConfig, DEFAULT_MAX_ERRORS, DEFAULT_MAX_STACK_DEPTH};
pub use registry::Registry;
pub use resolve::{compile_documents, CompiledSchemas};
pub use result::{ValidationError, ValidationResult};
pub use schema::{Dependency, Items, Keywords, NodeIndex, PatternProperty, Reference, SchemaKind, SchemaNode};
pub use validator::Validator;
pub use vm::MULTIPLE_OF_EPSILON;

pub use jsv_core::{EvaluationError, SchemaError};
