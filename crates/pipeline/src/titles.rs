//! Strict parsing of the generative title list.
//!
//! The response must be a JSON array whose elements are all strings. Nothing
//! is repaired: code fences, surrounding prose, nested arrays or non-string
//! elements are all rejected with `Error::Parse`.

use domain::{Error, Result};
use serde_json::Value;

/// Parse a generative response into movie titles.
///
/// The array may have any length, including zero. Titles are returned in
/// response order, unmodified.
pub fn parse_titles(raw: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::Parse(format!("response is not valid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::Parse(format!(
                "expected a JSON array of titles, got {}",
                kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(title) => Ok(title),
            other => Err(Error::Parse(format!(
                "element {} is {}, expected a string",
                index,
                kind(&other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
