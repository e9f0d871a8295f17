//! # jsv-cli — Command-Line Interface for the jsv Schema Engine
//!
//! Provides the `jsv` binary: a thin layer over [`jsv_schema::Validator`]
//! that loads JSON or YAML files and reports results.
//!
//! ## Subcommands
//!
//! - `jsv validate` — validate instance files against schema documents.
//! - `jsv compile` — compile schema documents and report their URIs.
//!
//! ```bash
//! jsv validate --schema defs.json --schema order.yaml order-1.json order-2.json
//! jsv validate -s schema.json --format json --max-errors 10 instance.json
//! jsv compile -s defs.json -s order.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - `0` — every instance is valid (or the schemas compiled).
//! - `1` — at least one instance is invalid.
//! - `2` — operational failure: unreadable input, malformed schema,
//!   unresolvable reference, or `$ref` depth exceeded.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers return exit codes.
//! - No validation logic here; everything delegates to `jsv-schema`.

pub mod compile;
pub mod config;
pub mod input;
pub mod validate;
