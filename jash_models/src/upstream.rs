use serde_json::Value;

/// The reply of the upstream backend to a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardingResult {
    /// `true` iff `status` is in the 2xx range
    pub ok: bool,
    pub status: u16,
    pub body: UpstreamBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ForwardingResult {
    pub fn new(status: u16, body: UpstreamBody) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body,
        }
    }
}

impl UpstreamBody {
    /// Interpret a raw response body, keeping the text if it is not valid JSON.
    pub fn parse(raw: String) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(raw),
        }
    }
}
