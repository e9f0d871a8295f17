//! # JSON Pointer (RFC 6901)
//!
//! A pointer is held as its sequence of unescaped reference tokens. The
//! canonical text form (`/a/b~1c`) is produced by `Display` and is the only
//! form used for registry keys and violation locations.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::PointerError;

/// A parsed JSON Pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The empty pointer, addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a pointer from already-unescaped tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse canonical pointer text.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::MissingLeadingSlash`] for non-empty text not
    /// starting with `/`, and [`PointerError::InvalidEscape`] for a `~` not
    /// followed by `0` or `1`.
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(PointerError::MissingLeadingSlash {
                pointer: text.to_string(),
            });
        };
        let tokens = rest
            .split('/')
            .map(|raw| unescape(raw, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    /// The unescaped reference tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consume the pointer, yielding its tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Whether this pointer addresses the whole document.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Resolve the pointer against a document.
    ///
    /// Array tokens must be canonical decimal indices (`0`, `12`, never
    /// `01` or `-`). Returns `None` when any token addresses nothing.
    pub fn evaluate<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        document.pointer(&self.to_string())
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape(token))?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn escape(token: &str) -> Cow<'_, str> {
    if token.contains(['~', '/']) {
        Cow::Owned(token.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(token)
    }
}

fn unescape(raw: &str, pointer: &str) -> Result<String, PointerError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(PointerError::InvalidEscape {
                    pointer: pointer.to_string(),
                })
            }
        }
    }
    Ok(out)
}
