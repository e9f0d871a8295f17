//! # Validator
//!
//! The public entry point: compile once, validate many times.
//!
//! A [`Validator`] owns a frozen [`Registry`]. Every `validate` call builds
//! its own evaluation stack and violation list, so a single validator can
//! be shared across threads.

use jsv_core::{EvaluationError, RefTarget, SchemaError};
use serde_json::Value;

use crate::compiler::CompiledRoot;
use crate::config::ValidatorConfig;
use crate::registry::Registry;
use crate::resolve::compile_documents;
use crate::result::ValidationResult;
use crate::schema::NodeIndex;
use crate::vm::Vm;

/// A compiled, cross-linked set of schema documents.
#[derive(Debug)]
pub struct Validator {
    registry: Registry,
    roots: Vec<CompiledRoot>,
    config: ValidatorConfig,
}

impl Validator {
    /// Compile `documents` with the default configuration.
    ///
    /// The last document is the primary schema used by
    /// [`Validator::validate`]; the others are available to `$ref` and to
    /// [`Validator::validate_uri`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a document is malformed or a `$ref`
    /// cannot be resolved within the supplied documents.
    pub fn new(documents: &[Value]) -> Result<Self, SchemaError> {
        Self::with_config(documents, ValidatorConfig::default())
    }

    /// Compile `documents` with explicit evaluation limits.
    ///
    /// # Errors
    ///
    /// See [`Validator::new`].
    pub fn with_config(documents: &[Value], config: ValidatorConfig) -> Result<Self, SchemaError> {
        let compiled = compile_documents(documents)?;
        tracing::debug!(
            documents = documents.len(),
            nodes = compiled.registry.len(),
            "validator ready"
        );
        Ok(Self {
            registry: compiled.registry,
            roots: compiled.roots,
            config,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The compiled schema graph.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Canonical URIs of the supplied documents, in supply order. An
    /// anonymous document is listed as `""`.
    pub fn roots(&self) -> Vec<&str> {
        self.roots.iter().map(|root| root.base.as_str()).collect()
    }

    /// Validate against the primary (last supplied) schema.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::StackOverflow`] when `$ref` nesting
    /// exceeds the configured depth, and [`EvaluationError::UnknownSchema`]
    /// when the validator was built from no documents.
    pub fn validate(&self, instance: &Value) -> Result<ValidationResult, EvaluationError> {
        let Some(root) = self.roots.last() else {
            return Err(EvaluationError::UnknownSchema { uri: String::new() });
        };
        self.run(root.base.as_str(), Vec::new(), root.index, instance)
    }

    /// Validate against the schema registered under `uri`.
    ///
    /// The selector is normalised the same way as `$id`, so
    /// `HTTP://Example.com/a` selects the document declared as
    /// `http://example.com/a`. A fragment selects a compiled sub-schema.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownSchema`] if nothing is registered
    /// under the selector, and [`EvaluationError::StackOverflow`] as for
    /// [`Validator::validate`].
    pub fn validate_uri(&self, uri: &str, instance: &Value) -> Result<ValidationResult, EvaluationError> {
        let unknown = || EvaluationError::UnknownSchema { uri: uri.to_string() };
        let target = RefTarget::parse(uri).map_err(|_| unknown())?;
        let index = self.registry.lookup(&target.key()).ok_or_else(unknown)?;
        self.run(
            target.base().as_str(),
            target.pointer().tokens().to_vec(),
            index,
            instance,
        )
    }

    fn run(
        &self,
        uri: &str,
        tokens: Vec<String>,
        index: NodeIndex,
        instance: &Value,
    ) -> Result<ValidationResult, EvaluationError> {
        let errors = Vm::new(&self.registry, self.config.max_stack_depth).exec(
            uri,
            tokens,
            index,
            instance,
            self.config.max_errors,
        )?;
        Ok(ValidationResult::new(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_validator_is_send_sync() {
        assert_send_sync::<Validator>();
    }

    #[test]
    fn test_validate_uses_last_document() {
        let validator = Validator::new(&[
            json!({"$id": "urn:first", "type": "string"}),
            json!({"$id": "urn:second", "type": "number"}),
        ])
        .unwrap();
        assert_eq!(validator.roots(), vec!["urn:first", "urn:second"]);
        assert!(validator.validate(&json!(1)).unwrap().is_valid());
        assert!(!validator.validate(&json!("x")).unwrap().is_valid());
    }

    #[test]
    fn test_validate_uri_normalises_selector() {
        let validator =
            Validator::new(&[json!({"$id": "http://example.com/a", "type": "null"})]).unwrap();
        assert!(validator
            .validate_uri("HTTP://Example.com/a", &json!(null))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn test_validate_uri_fragment_selects_sub_schema() {
        let validator = Validator::new(&[json!({
            "$id": "urn:doc",
            "properties": {"a": {"type": "string"}}
        })])
        .unwrap();
        let result = validator
            .validate_uri("urn:doc#/properties/a", &json!(5))
            .unwrap();
        let error = &result.errors()[0];
        assert_eq!(error.schema_uri, "urn:doc");
        assert_eq!(error.schema_path.to_string(), "/properties/a/type");
        assert!(error.instance_path.is_root());
    }

    #[test]
    fn test_unknown_selector() {
        let validator = Validator::new(&[json!({"$id": "urn:foo"})]).unwrap();
        assert_eq!(
            validator.validate_uri("urn:bar", &json!(1)).unwrap_err(),
            EvaluationError::UnknownSchema { uri: "urn:bar".into() }
        );
        assert!(matches!(
            validator.validate_uri("not a uri", &json!(1)),
            Err(EvaluationError::UnknownSchema { .. })
        ));
    }

    #[test]
    fn test_no_documents() {
        let validator = Validator::new(&[]).unwrap();
        assert!(validator.roots().is_empty());
        assert!(matches!(
            validator.validate(&json!(null)),
            Err(EvaluationError::UnknownSchema { .. })
        ));
    }

    #[test]
    fn test_config_limits_errors() {
        let schema = json!({"items": {"type": "string"}});
        let validator = Validator::with_config(
            &[schema],
            ValidatorConfig::default().with_max_errors(1),
        )
        .unwrap();
        assert_eq!(validator.validate(&json!([1, 2, 3])).unwrap().len(), 1);
        assert_eq!(validator.config().max_errors, 1);
    }
}
