//! Turn a failed response of the contact proxy into a message for the user

use serde_json::Value;

const UNKNOWN_ERROR: &str = "Unknown error.";

/// Extract a human readable message from an error response body.
///
/// Understands `{"detail": "..."}` as well as field error maps, whose values
/// may be strings or lists of strings. An empty object carries no message at
/// all. Falls back to the raw body, and to a generic message mentioning
/// `status` if the body is empty.
pub fn error_message(status: u16, body: &str) -> String {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) if map.is_empty() => UNKNOWN_ERROR.into(),
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            _ => map
                .iter()
                .map(|(field, messages)| format!("{field}: {}", join_messages(messages)))
                .collect::<Vec<_>>()
                .join("\n"),
        },
        Ok(Value::String(message)) => message,
        _ => body.trim().to_owned(),
    };

    if message.is_empty() {
        format!("Request failed ({status})")
    } else {
        message
    }
}

fn join_messages(messages: &Value) -> String {
    match messages {
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
        other => text(other),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
