//! Human table output.

use super::rows::Rows;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

pub fn render(rows: &Rows) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(rows.columns.clone());
    for row in &rows.cells {
        table.add_row(row.clone());
    }
    table.to_string()
}
