//! Size-limited JSON request bodies

use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::errors::error;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("Payload too large ({size} > {limit})")]
    PayloadTooLarge { size: u64, limit: usize },
    #[error("Invalid JSON body")]
    Malformed,
    #[error("Failed to read request body")]
    Read(#[source] axum::Error),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        let code = match &self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Malformed | Self::Read(_) => StatusCode::BAD_REQUEST,
        };
        error(code, self.to_string())
    }
}

/// Read the body of `request` and parse it as JSON.
///
/// A declared `Content-Length` above `limit` is rejected before reading. The
/// actual body is measured as well, so a missing or wrong header does not
/// bypass the limit. An empty body is treated as `{}`, anything that is not a
/// JSON object is malformed.
pub async fn read_json<T: DeserializeOwned>(request: Request, limit: usize) -> Result<T, BodyError> {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if let Some(size) = declared.filter(|&size| size > limit as u64) {
        return Err(BodyError::PayloadTooLarge { size, limit });
    }

    let mut stream = request.into_body().into_data_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Read)?;
        let size = buf.len() + chunk.len();
        if size > limit {
            return Err(BodyError::PayloadTooLarge {
                size: size as u64,
                limit,
            });
        }
        buf.extend_from_slice(&chunk);
    }

    if buf.is_empty() {
        buf.extend_from_slice(b"{}");
    }

    // Struct deserializers also accept sequences, so check the shape first.
    match serde_json::from_slice::<Value>(&buf) {
        Ok(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(|_| BodyError::Malformed)
        }
        _ => Err(BodyError::Malformed),
    }
}
