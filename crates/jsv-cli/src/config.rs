//! # Configuration Loading
//!
//! Builds the [`ValidatorConfig`] for a run: defaults, then an optional
//! YAML or JSON config file, then command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use jsv_schema::ValidatorConfig;

use crate::input::load_document;

/// Command-line limits that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub max_stack_depth: Option<usize>,
    pub max_errors: Option<usize>,
}

/// Resolve the effective configuration.
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ValidatorConfig> {
    let mut config = match path {
        Some(path) => {
            let value = load_document(path)?;
            serde_json::from_value(value)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => ValidatorConfig::default(),
    };

    if let Some(depth) = overrides.max_stack_depth {
        config = config.with_max_stack_depth(depth);
    }
    if let Some(max_errors) = overrides.max_errors {
        config = config.with_max_errors(max_errors);
    }
    tracing::debug!(
        max_stack_depth = config.max_stack_depth,
        max_errors = config.max_errors,
        "resolved validator configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jsv.yaml");
        std::fs::write(&path, "max_stack_depth: 32\nmax_errors: 10\n").unwrap();

        let config = load_config(
            Some(&path),
            ConfigOverrides {
                max_stack_depth: None,
                max_errors: Some(1),
            },
        )
        .unwrap();
        assert_eq!(config.max_stack_depth, 32);
        assert_eq!(config.max_errors, 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jsv.json");
        std::fs::write(&path, r#"{"max_depth": 3}"#).unwrap();
        let err = load_config(Some(&path), ConfigOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid configuration"));
    }
}
