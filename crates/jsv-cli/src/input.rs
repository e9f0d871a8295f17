//! # Document Loading
//!
//! Reads schema and instance files into the JSON value model. The format
//! is chosen by extension: `.yaml`/`.yml` parse as YAML, anything else as
//! JSON. YAML tags are ignored and scalar map keys are stringified.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Load one document from `path`.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            yaml_to_json_value(&yaml)
                .with_context(|| format!("cannot convert YAML in {} to JSON", path.display()))
        }
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display())),
    }
}

/// Load several documents, preserving order.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Value>> {
    paths.iter().map(|p| load_document(p.as_ref())).collect()
}

/// Convert a parsed YAML value into the JSON value model.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                match n.as_f64().and_then(serde_json::Number::from_f64) {
                    Some(number) => Ok(Value::Number(number)),
                    None => bail!("number {n} has no JSON representation"),
                }
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            seq.iter().map(yaml_to_json_value).collect::<Result<_>>().map(Value::Array)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => bail!("unsupported YAML map key: {other:?}"),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
