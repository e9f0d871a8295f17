//! # Schema URIs
//!
//! Identity and reference resolution for schema documents.
//!
//! A document is identified by a [`BaseUri`]: either an absolute,
//! fragment-free URI taken from the root `$id`, or anonymous when the
//! document declares none. Every compiled node is keyed by its document's
//! base plus the JSON Pointer from the document root:
//!
//! ```text
//! http://example.com/root.json                   document root
//! http://example.com/root.json#/properties/foo   nested schema
//! #/items/0                                      nested schema, anonymous document
//! ```
//!
//! A `$ref` resolves to a [`RefTarget`] whose [`RefTarget::key`] uses the
//! same format, which is what lets the registry link references with a
//! plain string lookup. Pointer text in keys is never percent-encoded.

use std::fmt;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::UriError;
use crate::pointer::JsonPointer;

/// The base URI of a schema document, or none for an anonymous document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BaseUri(Option<Url>);

impl BaseUri {
    /// The base of a document without `$id`.
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// Parse a root `$id`.
    ///
    /// The URI must be absolute. An empty fragment (`urn:foo#`) is dropped;
    /// any other fragment is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::NotAbsolute`] for relative text,
    /// [`UriError::UnexpectedFragment`] for a non-empty fragment, and
    /// [`UriError::Invalid`] for text that is not a URI at all.
    pub fn parse_id(id: &str) -> Result<Self, UriError> {
        let mut url = Url::parse(id).map_err(|e| match e {
            url::ParseError::RelativeUrlWithoutBase => UriError::NotAbsolute {
                uri: id.to_string(),
            },
            other => UriError::Invalid {
                uri: id.to_string(),
                reason: other.to_string(),
            },
        })?;
        match url.fragment() {
            None => {}
            Some("") => url.set_fragment(None),
            Some(_) => {
                return Err(UriError::UnexpectedFragment {
                    uri: id.to_string(),
                })
            }
        }
        Ok(Self(Some(url)))
    }

    /// Whether the document has no base URI.
    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }

    /// The normalised URI text, or `""` when anonymous.
    pub fn as_str(&self) -> &str {
        self.0.as_ref().map_or("", Url::as_str)
    }

    /// The registry key of the schema found at `pointer` in this document.
    pub fn key(&self, pointer: &JsonPointer) -> String {
        if pointer.is_root() {
            self.as_str().to_string()
        } else {
            format!("{}#{}", self.as_str(), pointer)
        }
    }

    /// Resolve a `$ref` value against this base.
    ///
    /// Fragment-only references stay in this document. Anything else is
    /// joined to the base, or must itself be absolute when the document is
    /// anonymous. The fragment is percent-decoded and parsed as a JSON
    /// Pointer; an empty fragment is the same as no fragment.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::NoBase`] for a relative reference in an anonymous
    /// document, and the fragment errors of [`UriError`] when the fragment
    /// is not a JSON Pointer.
    pub fn resolve(&self, reference: &str) -> Result<RefTarget, UriError> {
        let (base, fragment) = match reference.strip_prefix('#') {
            Some(fragment) => (self.clone(), fragment.to_string()),
            None => {
                let joined = match &self.0 {
                    Some(base) => base.join(reference),
                    None => Url::parse(reference),
                };
                let mut url = joined.map_err(|e| match e {
                    url::ParseError::RelativeUrlWithoutBase => UriError::NoBase {
                        uri: reference.to_string(),
                    },
                    other => UriError::Invalid {
                        uri: reference.to_string(),
                        reason: other.to_string(),
                    },
                })?;
                let fragment = url.fragment().unwrap_or_default().to_string();
                url.set_fragment(None);
                (Self(Some(url)), fragment)
            }
        };
        let pointer = parse_fragment(&fragment, reference)?;
        Ok(RefTarget { base, pointer })
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a `$ref` points: a document base and a pointer into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefTarget {
    base: BaseUri,
    pointer: JsonPointer,
}

impl RefTarget {
    /// Parse an already-absolute selector such as `urn:foo`,
    /// `http://a/b#/definitions/c`, or `""` for the anonymous document.
    ///
    /// # Errors
    ///
    /// Returns [`UriError`] if the base part is not an absolute URI or the
    /// fragment is not a JSON Pointer.
    pub fn parse(text: &str) -> Result<Self, UriError> {
        let (base_text, fragment) = text.split_once('#').unwrap_or((text, ""));
        let base = if base_text.is_empty() {
            BaseUri::anonymous()
        } else {
            BaseUri::parse_id(base_text)?
        };
        let pointer = parse_fragment(fragment, text)?;
        Ok(Self { base, pointer })
    }

    /// The target document's base URI.
    pub fn base(&self) -> &BaseUri {
        &self.base
    }

    /// The location within the target document.
    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    /// The registry key of the target schema.
    pub fn key(&self) -> String {
        self.base.key(&self.pointer)
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn parse_fragment(fragment: &str, uri: &str) -> Result<JsonPointer, UriError> {
    let decoded = percent_decode_str(fragment)
        .decode_utf8()
        .map_err(|_| UriError::FragmentEncoding {
            uri: uri.to_string(),
        })?;
    JsonPointer::parse(&decoded).map_err(|source| UriError::FragmentPointer {
        uri: uri.to_string(),
        source,
    })
}
