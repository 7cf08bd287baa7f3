//! GitHub-flavored Markdown table output.

use super::rows::Rows;

pub fn render(rows: &Rows) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut lines = Vec::with_capacity(rows.cells.len() + 2);
    lines.push(line(rows.columns.iter().map(String::as_str)));
    lines.push(line(rows.columns.iter().map(|_| "---")));
    for row in &rows.cells {
        lines.push(line(row.iter().map(String::as_str)));
    }
    lines.join("\n")
}

fn line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let escaped: Vec<String> = cells.map(escape).collect();
    format!("| {} |", escaped.join(" | "))
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}
