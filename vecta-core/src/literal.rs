/// Literal rendering for the query language
///
/// The query language is typed: `1` is an Int and `1.0` is a Float, so
/// floats always keep a decimal point and integers never get one.

use serde_json::Value as Json;

/// Render a float with its shortest round-trip decimal form, keeping a
/// decimal point on whole numbers (`1.0`, not `1`).
pub fn float(value: f64) -> String {
    let rendered = value.to_string();
    if rendered.contains('.') || rendered.contains("inf") || rendered.contains("NaN") {
        rendered
    } else {
        format!("{}.0", rendered)
    }
}

/// Render a string as a double-quoted, escaped literal.
pub fn string(value: &str) -> String {
    Json::String(value.to_string()).to_string()
}

/// Render `["a", "b"]`.
pub fn string_list<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values.iter().map(|v| string(v.as_ref())).collect();
    format!("[{}]", items.join(", "))
}
