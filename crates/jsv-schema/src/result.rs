//! # Validation Results
//!
//! The output of a `validate` call: an ordered list of located violations.
//! An empty list means the instance is valid.

use std::fmt;

use jsv_core::JsonPointer;
use serde::Serialize;

/// One located violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Location of the offending value within the instance.
    pub instance_path: JsonPointer,
    /// Location of the failed keyword within the schema document named by
    /// `schema_uri`.
    pub schema_path: JsonPointer,
    /// Base URI of the schema document; empty for an anonymous document.
    #[serde(rename = "schemaURI")]
    pub schema_uri: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_root() {
            write!(f, "(root)")?;
        } else {
            write!(f, "{}", self.instance_path)?;
        }
        write!(f, " violates {}#{}", self.schema_uri, self.schema_path)
    }
}

/// Collection of violations from one `validate` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Returns true if there are no violations.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all violations, in evaluation order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error(instance: &[&str], schema: &[&str], uri: &str) -> ValidationError {
        ValidationError {
            instance_path: JsonPointer::from_tokens(instance.iter().copied()),
            schema_path: JsonPointer::from_tokens(schema.iter().copied()),
            schema_uri: uri.to_string(),
        }
    }

    #[test]
    fn test_display_format() {
        let e = error(&["a", "0"], &["properties", "a", "items", "type"], "urn:foo");
        assert_eq!(e.to_string(), "/a/0 violates urn:foo#/properties/a/items/type");
    }

    #[test]
    fn test_display_root() {
        let e = error(&[], &["required", "0"], "");
        assert_eq!(e.to_string(), "(root) violates #/required/0");
    }

    #[test]
    fn test_serializes_with_canonical_pointers() {
        let result = ValidationResult::new(vec![error(&["x"], &["type"], "urn:foo")]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!([{"instancePath": "/x", "schemaPath": "/type", "schemaURI": "urn:foo"}])
        );
        assert!(!result.is_valid());
        assert_eq!(result.len(), 1);
    }
}
