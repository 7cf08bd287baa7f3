//! CSV output for flat metric rows.

use super::rows::Rows;
use crate::error::ApiError;

pub fn render(rows: &Rows) -> Result<String, ApiError> {
    if rows.is_empty() {
        return Ok(String::new());
    }
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(&rows.columns)?;
    for row in &rows.cells {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Render(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| ApiError::Render(e.to_string()))?;
    Ok(text.trim_end_matches('\n').to_string())
}
