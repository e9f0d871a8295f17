//! # Compile Subcommand
//!
//! Builds a validator from schema documents without validating anything,
//! to check that they are well-formed and that every `$ref` resolves.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jsv_schema::Validator;

/// Arguments for the `jsv compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Schema document (JSON or YAML). Repeat to supply several.
    #[arg(short = 's', long = "schema", value_name = "FILE", required = true)]
    pub schemas: Vec<PathBuf>,
}

/// Execute the compile subcommand.
pub fn run_compile(args: &CompileArgs) -> Result<u8> {
    print!("{}", compile_summary(args)?);
    Ok(0)
}

/// Compile the schemas and describe the result.
pub fn compile_summary(args: &CompileArgs) -> Result<String> {
    let documents = crate::input::load_documents(&args.schemas)?;
    let validator = Validator::new(&documents).context("failed to compile schemas")?;

    let mut out = String::new();
    for (path, uri) in args.schemas.iter().zip(validator.roots()) {
        let uri = if uri.is_empty() { "(anonymous)" } else { uri };
        out.push_str(&format!("{}: {uri}\n", path.display()));
    }
    out.push_str(&format!(
        "compiled {} schema node(s) from {} document(s)\n",
        validator.registry().len(),
        documents.len()
    ));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_roots_and_node_count() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.yaml");
        std::fs::write(&a, r#"{"$id": "urn:a", "items": {"$ref": "urn:b"}}"#).unwrap();
        std::fs::write(&b, "type: string\n$id: urn:b\n").unwrap();

        let summary = compile_summary(&CompileArgs {
            schemas: vec![a.clone(), b],
        })
        .unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], format!("{}: urn:a", a.display()));
        assert!(lines[1].ends_with("b.yaml: urn:b"));
        assert_eq!(lines[2], "compiled 3 schema node(s) from 2 document(s)");
    }

    #[test]
    fn malformed_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"minLength": 3.14}"#).unwrap();
        let err = compile_summary(&CompileArgs { schemas: vec![path] }).unwrap_err();
        assert!(format!("{err:#}").contains("#/minLength"));
    }
}
