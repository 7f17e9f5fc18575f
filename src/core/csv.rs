//! core/csv.rs
//! Flatten JSON objects into a table, and render the table as CSV.
//!
//! Flattening rules:
//! - nested objects become dotted headers (`a.b.c`)
//! - arrays with 0 items => "", 1 item => that item (objects recurse)
//! - arrays with 2+ items: object items are merged by key into `path.key`
//!   columns holding a JSON array; other items go into one JSON array under `path`
//! - `null` contributes nothing
//!
//! Headers appear in first-seen order. Every cell is quoted on output.

use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Rows as built: cells may be missing.
#[derive(Default)]
struct Sparse {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Sparse {
    fn column(&mut self, header: &str) -> usize {
        match self.headers.iter().position(|h| h == header) {
            Some(i) => i,
            None => {
                self.headers.push(header.to_string());
                self.headers.len() - 1
            }
        }
    }

    fn put(&mut self, column: usize, cell: Option<String>) {
        if let Some(row) = self.rows.last_mut() {
            if row.len() <= column {
                row.resize(column + 1, None);
            }
            row[column] = cell;
        }
    }

    fn put_at(&mut self, header: &str, cell: String) {
        let column = self.column(header);
        self.put(column, Some(cell));
    }

    /// Flatten `value` under `pre + key + "."` into the current row.
    fn nested(&mut self, value: &Value, pre: &str, key: &str, disable_arrays: bool) {
        let inner = convert(std::slice::from_ref(value), &format!("{pre}{key}."), disable_arrays);
        let columns: Vec<usize> = inner.headers.iter().map(|h| self.column(h)).collect();
        if let Some(row) = inner.rows.into_iter().next() {
            for (i, cell) in row.into_iter().enumerate() {
                self.put(columns[i], cell);
            }
        }
    }
}

/// Object members, or array items keyed by index. Scalars have none.
fn members(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => Vec::new(),
    }
}

/// Scalar as plain text. Integral floats print without a fraction.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_object_like(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_) | Value::Null)
}

fn convert(objects: &[Value], pre: &str, disable_arrays: bool) -> Sparse {
    let mut out = Sparse::default();

    for object in objects {
        out.rows.push(Vec::new());

        for (original_key, value) in members(object) {
            let key = format!("{pre}{original_key}");

            match value {
                Value::Array(items) if !disable_arrays => {
                    if items.len() < 2 {
                        out.column(&key);
                    }
                    match items.as_slice() {
                        [] => out.put_at(&key, String::new()),
                        [only] if is_object_like(only) => {
                            out.nested(only, pre, &original_key, true)
                        }
                        [only] => out.put_at(&key, scalar_text(only)),
                        _ => {
                            let mut merged: IndexMap<String, Vec<Value>> = IndexMap::new();
                            let mut plain = Vec::new();
                            for item in items {
                                match item {
                                    Value::Object(_) | Value::Array(_) => {
                                        for (k, v) in members(item) {
                                            merged.entry(k).or_default().push(v.clone());
                                        }
                                    }
                                    other => plain.push(other.clone()),
                                }
                            }
                            for (k, values) in merged {
                                out.put_at(&format!("{key}.{k}"), Value::Array(values).to_string());
                            }
                            if !plain.is_empty() {
                                out.put_at(&key, Value::Array(plain).to_string());
                            }
                        }
                    }
                }
                v if is_object_like(v) => out.nested(v, pre, &original_key, false),
                v => out.put_at(&key, scalar_text(v)),
            }
        }
    }

    out
}

/// Flatten one row per object.
pub fn flatten(objects: &[Value]) -> Table {
    let sparse = convert(objects, "", false);
    let width = sparse.headers.len();
    let rows = sparse
        .rows
        .into_iter()
        .map(|row| {
            let mut row: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
            row.resize(width, String::new());
            row
        })
        .collect();

    Table {
        headers: sparse.headers,
        rows,
    }
}

fn cell(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn line(cells: &[String]) -> String {
    let mut out = cells.iter().map(|c| cell(c)).collect::<Vec<_>>().join(",");
    out.push('\n');
    out
}

/// Quoted CSV, header line first.
pub fn render(table: &Table) -> String {
    let mut out = line(&table.headers);
    for row in &table.rows {
        out.push_str(&line(row));
    }
    out
}
