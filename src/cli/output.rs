//! CLI output: turns the finished envelope into stdout text, stderr lines and
//! an exit code. The binary only prints what this returns.

use crate::envelope::Envelope;
use crate::error::{ApiError, ClassifiedError};
use crate::exit_code::exit_code_of;
use crate::projection::project_fields;
use crate::render::{render, OutputFormat, RenderFormat};
use serde_json::Value;
use tracing::warn;

/// Last-resort body when even the fallback envelope cannot be serialized.
const UNRENDERABLE: &str = r#"{"data":null,"error":{"code":"GENERAL_ERROR","message":"failed to render output","details":null,"hint":null},"meta":{"durationMs":0,"services":[],"pagination":{"startToken":"","nextToken":""},"warnings":[]}}"#;

/// Resolved rendering choices for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub fields: Option<String>,
}

impl OutputOptions {
    /// Resolve `--output` against the configured default. An unknown name
    /// fails; callers fall back to [`OutputOptions::json`] to report it.
    pub fn resolve(
        flag: Option<&str>,
        configured: &str,
        pretty: bool,
        fields: Option<String>,
    ) -> Result<Self, ApiError> {
        let format = OutputFormat::parse(flag.unwrap_or(configured))?;
        Ok(Self {
            format,
            pretty,
            fields,
        })
    }

    /// Plain JSON with the caller's pretty flag.
    pub fn json(pretty: bool) -> Self {
        Self {
            format: OutputFormat::Json,
            pretty,
            fields: None,
        }
    }
}

/// Everything the process writes before exiting.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub stdout: String,
    pub stderr_lines: Vec<String>,
    pub exit_code: i32,
}

pub fn emit(envelope: &Envelope, options: &OutputOptions) -> Rendered {
    match try_emit(envelope, options) {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!(error = %e, "Render failed; emitting error envelope");
            let fallback = Envelope::from_error(ClassifiedError::general(e.to_string()))
                .with_services(envelope.meta().services.iter().cloned());
            let stdout = serde_json::to_string(&fallback).unwrap_or_else(|_| UNRENDERABLE.to_string());
            Rendered {
                stdout,
                stderr_lines: Vec::new(),
                exit_code: exit_code_of(fallback.error()),
            }
        }
    }
}

fn try_emit(envelope: &Envelope, options: &OutputOptions) -> Result<Rendered, ApiError> {
    let exit_code = exit_code_of(envelope.error());
    let tree = envelope.to_value()?;

    // Tabular formats cannot carry the error object, and projection paths
    // address data; error envelopes are always rendered whole as JSON.
    if !envelope.is_success() {
        let format = RenderFormat::select(OutputFormat::Json, options.pretty);
        return Ok(Rendered {
            stdout: render(&tree, format)?,
            stderr_lines: Vec::new(),
            exit_code,
        });
    }

    let tree: Value = project_fields(tree, options.fields.as_deref());
    let format = RenderFormat::select(options.format, options.pretty);
    let stderr_lines = if options.format.is_tabular() {
        envelope
            .meta()
            .warnings
            .iter()
            .map(|w| format!("warning: {}", w))
            .collect()
    } else {
        Vec::new()
    };

    Ok(Rendered {
        stdout: render(&tree, format)?,
        stderr_lines,
        exit_code,
    })
}
