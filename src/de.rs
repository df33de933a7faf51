use serde::de::{Deserialize, Deserializer, Error};
use serde_json::Value;

/// Accept only `true`, for the `ok` field of successful Slack responses.
pub fn only_true<'a, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'a>,
{
    bool::deserialize(deserializer).and_then(|b| {
        if b {
            Ok(b)
        } else {
            Err(Error::custom("invalid bool: false"))
        }
    })
}

/// Accept only `false`, for the `ok` field of unsuccessful Slack responses.
pub fn only_false<'a, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'a>,
{
    bool::deserialize(deserializer).and_then(|b| {
        if b {
            Err(Error::custom("invalid bool: true"))
        } else {
            Ok(b)
        }
    })
}

/// Whether a JSON value would be considered "truthy" by a JavaScript caller.
///
/// `null`, `false`, zero, and the empty string are falsy. Every array and
/// object is truthy, including empty ones.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
