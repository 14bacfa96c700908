use serde_json::Value;

use crate::{
    error::{Result, ScriptError},
    types::ScriptSegment,
};

/// Decode backend output into segments, checking every element.
///
/// Extra fields on an element are ignored; a missing or non-string
/// `timestamp`, `narration` or `broll` rejects the whole response.
pub fn parse_segments(backend: &'static str, text: &str) -> Result<Vec<ScriptSegment>> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| ScriptError::InvalidShape {
            backend,
            reason: format!("not valid JSON ({e})"),
        })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ScriptError::InvalidShape {
                backend,
                reason: format!("expected an array, got {}", describe(&other)),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ScriptSegment>(item).map_err(|e| ScriptError::InvalidShape {
                backend,
                reason: format!("segment {index} is malformed ({e})"),
            })
        })
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
