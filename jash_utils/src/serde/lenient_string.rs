//! Deserialize any JSON scalar as a string
//!
//! Browsers and scripts do not always send strings for text fields. Numbers
//! and booleans are kept in their textual form, `null` becomes the empty
//! string. Arrays and objects are rejected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom(
            "expected a string, number, boolean or null",
        )),
    }
}
