use bytes::Bytes;
use serde_json::{Map, Value};

/// A film record exactly as the upstream published it.
pub type RawFilm = Map<String, Value>;

/// Image body and declared content type as received from the host.
#[derive(Debug, Clone)]
pub struct UpstreamImage {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Flattens a catalog response into raw records.
///
/// Accepts either a bare array or an object wrapping the array in `data`.
/// Array elements that are not objects are ignored.
pub fn parse_film_payload(payload: Value) -> Result<Vec<RawFilm>, String> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err("`data` is not an array".to_string()),
            None => return Err("object has no `data` field".to_string()),
        },
        other => return Err(format!("unexpected payload: {}", json_kind(&other))),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
