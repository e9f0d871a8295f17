//! # jsv-core — Foundational Primitives for the jsv Schema Engine
//!
//! This crate is the leaf of the jsv workspace. It holds the small,
//! self-contained primitives the schema compiler and the validation engine
//! are built on, so that neither of them has to reason about text encodings
//! or number representations directly.
//!
//! ## Key Design Principles
//!
//! 1. **One value model.** Instances and raw schemas are both
//!    `serde_json::Value`. [`JsonType`] classifies a value; the `Integer`
//!    refinement of `Number` is decided at validation time by
//!    [`JsonType::matches`], never at compile time.
//!
//! 2. **Numbers compare by value.** [`json_equal`] treats `1` and `1.0` as
//!    the same number, which `Value`'s derived `PartialEq` does not.
//!
//! 3. **Pointers are token sequences.** [`JsonPointer`] stores unescaped
//!    tokens and renders canonical text on demand. Registry keys and
//!    violation locations always use the canonical rendering.
//!
//! 4. **URIs are normalised once.** [`BaseUri`] and [`RefTarget`] are the
//!    only places that parse URI text. Everything downstream compares the
//!    canonical strings they produce.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod json;
pub mod pointer;
pub mod uri;

// Re-export primary types for ergonomic imports.
pub use error::{EvaluationError, PointerError, SchemaError, UriError};
pub use json::{code_point_len, is_integer, json_equal, number_value, JsonType};
pub use pointer::JsonPointer;
pub use uri::{BaseUri, RefTarget};
