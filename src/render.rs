//! Format renderer: serializes a (possibly projected) envelope tree.
//!
//! JSON formats render the whole tree. Tabular formats (table, markdown, csv)
//! render only the rows derived from `data`; see [`rows`].

mod delimited;
mod markdown;
pub mod rows;
mod table;

use crate::error::ApiError;
use serde_json::Value;
use std::fmt;

pub use rows::Rows;

/// User-facing `--output` choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Markdown,
    Csv,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["json", "table", "markdown", "csv"];

    pub fn parse(raw: &str) -> Result<OutputFormat, ApiError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ApiError::Validation(format!(
                "unknown output format '{}' (expected one of: {})",
                raw,
                Self::NAMES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn is_tabular(self) -> bool {
        !matches!(self, OutputFormat::Json)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete renderer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    JsonCompact,
    JsonPretty,
    Table,
    Markdown,
    Csv,
}

impl RenderFormat {
    pub fn select(output: OutputFormat, pretty: bool) -> RenderFormat {
        match (output, pretty) {
            (OutputFormat::Json, false) => RenderFormat::JsonCompact,
            (OutputFormat::Json, true) => RenderFormat::JsonPretty,
            (OutputFormat::Table, _) => RenderFormat::Table,
            (OutputFormat::Markdown, _) => RenderFormat::Markdown,
            (OutputFormat::Csv, _) => RenderFormat::Csv,
        }
    }
}

/// Render `tree` (a serialized envelope, possibly projected). The result has
/// no trailing newline.
pub fn render(tree: &Value, format: RenderFormat) -> Result<String, ApiError> {
    match format {
        RenderFormat::JsonCompact => Ok(serde_json::to_string(tree)?),
        RenderFormat::JsonPretty => Ok(serde_json::to_string_pretty(tree)?),
        RenderFormat::Table => Ok(table::render(&data_rows(tree))),
        RenderFormat::Markdown => Ok(markdown::render(&data_rows(tree))),
        RenderFormat::Csv => delimited::render(&data_rows(tree)),
    }
}

fn data_rows(tree: &Value) -> Rows {
    tree.get("data")
        .map(Rows::from_data)
        .unwrap_or_default()
}
