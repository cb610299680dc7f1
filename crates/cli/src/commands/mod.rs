pub mod attach;
pub mod fields;
pub mod list;
pub mod record;
pub mod url;

use serde_json::Value;

/// Render a field value for text output: strings bare, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
