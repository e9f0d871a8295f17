//! # Validate Subcommand
//!
//! Validates one or more instance files against a set of schema documents.
//!
//! Every `--schema` file is supplied to the validator in the order given;
//! the last one is the primary schema unless `--uri` selects another
//! compiled document or sub-schema.
//!
//! Returns exit code 0 when every instance is valid and 1 when any is
//! invalid. Construction failures, unreadable files and evaluation errors
//! propagate as errors.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use jsv_schema::{ValidationError, ValidationResult, Validator};
use serde::Serialize;

use crate::config::{load_config, ConfigOverrides};
use crate::input::{load_document, load_documents};

/// Report format for validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One status line per instance, then one indented line per violation.
    #[default]
    Text,
    /// One JSON object per instance, one per line.
    Json,
}

/// Arguments for the `jsv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML). Repeat to supply referenced
    /// documents; the last one is validated against by default.
    #[arg(short = 's', long = "schema", value_name = "FILE", required = true)]
    pub schemas: Vec<PathBuf>,

    /// Validate against the schema registered under this URI instead.
    #[arg(long)]
    pub uri: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Validator configuration file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum nested `$ref` depth; overrides the config file.
    #[arg(long)]
    pub max_stack_depth: Option<usize>,

    /// Stop after this many violations per instance (0 = no limit);
    /// overrides the config file.
    #[arg(long)]
    pub max_errors: Option<usize>,

    /// Instance documents to validate.
    #[arg(value_name = "INSTANCE", required = true)]
    pub instances: Vec<PathBuf>,
}

/// Outcome for one instance file.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub instance: PathBuf,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl InstanceReport {
    fn new(instance: &Path, result: ValidationResult) -> Self {
        Self {
            instance: instance.to_path_buf(),
            valid: result.is_valid(),
            errors: result.into_errors(),
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let reports = validate_instances(args)?;
    print!("{}", render(&reports, args.format)?);

    let invalid = reports.iter().filter(|r| !r.valid).count();
    tracing::info!(
        instances = reports.len(),
        invalid,
        "validation finished"
    );
    Ok(if invalid > 0 { 1 } else { 0 })
}

/// Build the validator and check every instance.
pub fn validate_instances(args: &ValidateArgs) -> Result<Vec<InstanceReport>> {
    let config = load_config(
        args.config.as_deref(),
        ConfigOverrides {
            max_stack_depth: args.max_stack_depth,
            max_errors: args.max_errors,
        },
    )?;
    let documents = load_documents(&args.schemas)?;
    let validator =
        Validator::with_config(&documents, config).context("failed to compile schemas")?;

    args.instances
        .iter()
        .map(|path| {
            let instance = load_document(path)?;
            let result = match &args.uri {
                Some(uri) => validator.validate_uri(uri, &instance),
                None => validator.validate(&instance),
            }
            .with_context(|| format!("failed to validate {}", path.display()))?;
            Ok(InstanceReport::new(path, result))
        })
        .collect()
}

/// Render reports in the requested format.
pub fn render(reports: &[InstanceReport], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    for report in reports {
        match format {
            OutputFormat::Text => {
                let status = if report.valid { "valid" } else { "invalid" };
                writeln!(out, "{}: {status}", report.instance.display())?;
                for error in &report.errors {
                    writeln!(out, "  {error}")?;
                }
            }
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string(report)?)?;
            }
        }
    }
    Ok(out)
}
