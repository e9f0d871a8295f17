//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout jsv. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Construction failures ([`SchemaError`]) are authoring bugs in the
//!   supplied schemas. They abort building a validator; no partial validator
//!   is ever produced.
//! - Evaluation failures ([`EvaluationError`]) are the only errors a
//!   `validate` call can return. A failed keyword check is not an error: it
//!   is reported as a violation in the validation result.

use thiserror::Error;

/// Error parsing JSON Pointer text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// Non-empty pointer text must start with `/`.
    #[error("JSON pointer '{pointer}' must be empty or start with '/'")]
    MissingLeadingSlash {
        /// The offending pointer text.
        pointer: String,
    },

    /// A `~` was not followed by `0` or `1`.
    #[error("JSON pointer '{pointer}' contains an invalid '~' escape")]
    InvalidEscape {
        /// The offending pointer text.
        pointer: String,
    },
}

/// Error parsing or resolving a schema URI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// The text is not a URI, or a reference could not be joined to its base.
    #[error("invalid URI '{uri}': {reason}")]
    Invalid {
        /// The URI text as written in the schema.
        uri: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// `$id` must be an absolute URI.
    #[error("'{uri}' is not an absolute URI")]
    NotAbsolute {
        /// The `$id` text.
        uri: String,
    },

    /// `$id` may not carry a non-empty fragment.
    #[error("'{uri}' must not contain a fragment")]
    UnexpectedFragment {
        /// The `$id` text.
        uri: String,
    },

    /// A relative reference appeared in a document with no base URI.
    #[error("relative reference '{uri}' has no base URI to resolve against")]
    NoBase {
        /// The `$ref` text.
        uri: String,
    },

    /// The fragment is not UTF-8 once percent-decoded.
    #[error("fragment of '{uri}' is not valid UTF-8 after percent-decoding")]
    FragmentEncoding {
        /// The `$ref` text.
        uri: String,
    },

    /// The fragment is not a JSON Pointer.
    #[error("fragment of '{uri}' is not a JSON pointer: {source}")]
    FragmentPointer {
        /// The `$ref` text.
        uri: String,
        /// The pointer parse failure.
        source: PointerError,
    },
}

/// Error while compiling schema documents into a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A keyword had the wrong shape, an unknown `type` name, an
    /// uncompilable pattern, a bad `$id`, or an unresolvable-by-construction
    /// `$ref`.
    #[error("malformed schema at {location}: {reason}")]
    Malformed {
        /// Canonical URI of the offending schema, followed by the keyword.
        location: String,
        /// What was wrong with the keyword value.
        reason: String,
    },

    /// One or more `$ref` targets name documents that were never supplied.
    #[error("unresolvable schema references: {}", uris.join(", "))]
    UnresolvedReferences {
        /// Undefined URIs, deduplicated, in discovery order.
        uris: Vec<String>,
    },
}

/// Error raised by a `validate` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// Following a `$ref` chain would exceed the configured schema-frame
    /// depth. Cyclic schemas such as `{ "$ref": "#" }` end here.
    #[error("schema stack depth limit of {max_depth} exceeded while following $ref")]
    StackOverflow {
        /// The configured maximum depth.
        max_depth: usize,
    },

    /// The validate selector names no compiled schema.
    #[error("no schema registered under URI '{uri}'")]
    UnknownSchema {
        /// The selector, as normalised for lookup.
        uri: String,
    },

    /// A `$ref` was reached whose target was never bound. Validators built
    /// through construction link every reference, so this marks a registry
    /// assembled by hand.
    #[error("$ref to '{uri}' was never linked")]
    UnlinkedReference {
        /// Canonical URI of the reference target.
        uri: String,
    },
}
