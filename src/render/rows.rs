//! Row extraction for tabular formats.
//!
//! - array of objects: columns are the union of keys in first-seen order,
//! - single object: one row,
//! - scalar or array containing non-objects: one unnamed column,
//! - `null` or an empty array: no rows.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl Rows {
    pub fn from_data(data: &Value) -> Rows {
        match data {
            Value::Null => Rows::default(),
            Value::Array(items) if items.is_empty() => Rows::default(),
            Value::Array(items) if items.iter().all(Value::is_object) => object_rows(items),
            Value::Array(items) => Rows {
                columns: vec![String::new()],
                cells: items.iter().map(|item| vec![cell_text(item)]).collect(),
            },
            Value::Object(_) => object_rows(std::slice::from_ref(data)),
            scalar => Rows {
                columns: vec![String::new()],
                cells: vec![vec![cell_text(scalar)]],
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn object_rows(items: &[Value]) -> Rows {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let cells = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|column| item.get(column).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Rows { columns, cells }
}

/// Text of one cell. Nested values use their compact JSON form.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
