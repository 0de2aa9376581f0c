use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use jash_core_contact_contracts::{
    ContactService, ContactStatus, ContactSubmitError, ContactSubmitOutcome, UpstreamStatus,
};
use jash_models::{
    contact::ContactFields,
    upstream::{ForwardingResult, UpstreamBody},
};

use crate::{
    errors::error,
    extractors::body::read_json,
    models::{contact::ApiContactStatus, OkResponse},
};

pub const CONTACT_ROUTE: &str = "/api/contact";

struct ContactState<Contact> {
    service: Arc<Contact>,
    max_body_size: usize,
}

impl<Contact> Clone for ContactState<Contact> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            max_body_size: self.max_body_size,
        }
    }
}

pub fn router(service: Arc<impl ContactService>, max_body_size: usize) -> Router<()> {
    Router::new()
        .route(CONTACT_ROUTE, routing::get(status).post(submit))
        .with_state(ContactState {
            service,
            max_body_size,
        })
}

async fn status(state: State<ContactState<impl ContactService>>) -> Response {
    let status = state.service.status().await;
    (status_code(&status), Json(ApiContactStatus::from(status))).into_response()
}

async fn submit(state: State<ContactState<impl ContactService>>, request: Request) -> Response {
    let fields = match read_json::<ContactFields>(request, state.max_body_size).await {
        Ok(fields) => fields,
        Err(err) => return err.into_response(),
    };

    match state.service.submit(fields).await {
        Ok(ContactSubmitOutcome::Forwarded(result)) => forwarded(result),
        // Indistinguishable from a real submission
        Ok(ContactSubmitOutcome::Deflected) => {
            (StatusCode::CREATED, Json(OkResponse::plain())).into_response()
        }
        Err(ContactSubmitError::Validation(errors)) => {
            (StatusCode::BAD_REQUEST, Json(errors)).into_response()
        }
        Err(ContactSubmitError::NotConfigured) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Contact service is not configured",
        ),
        Err(ContactSubmitError::Timeout) => error(StatusCode::BAD_GATEWAY, "Upstream timed out"),
        Err(ContactSubmitError::Network(_)) => {
            error(StatusCode::BAD_GATEWAY, "Proxy error: fetch failed")
        }
    }
}

/// Relay the upstream reply, keeping its status code.
fn forwarded(ForwardingResult { ok, status, body }: ForwardingResult) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);

    match (ok, body) {
        (_, UpstreamBody::Json(value)) => (status, Json(value)).into_response(),
        (true, UpstreamBody::Empty) => (status, Json(OkResponse::plain())).into_response(),
        (true, UpstreamBody::Text(raw)) => {
            (status, Json(OkResponse::with_detail(raw))).into_response()
        }
        (false, UpstreamBody::Text(raw)) => error(status, raw),
        (false, UpstreamBody::Empty) => error(status, "Upstream error"),
    }
}

fn status_code(status: &ContactStatus) -> StatusCode {
    match status.upstream {
        None => StatusCode::INTERNAL_SERVER_ERROR,
        Some(UpstreamStatus::Unreachable) => StatusCode::BAD_GATEWAY,
        Some(UpstreamStatus::Reachable { status }) => match StatusCode::from_u16(status) {
            Ok(code) if code.is_success() => StatusCode::OK,
            Ok(code) if code.is_client_error() || code.is_server_error() => code,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable(status: u16) -> ContactStatus {
        ContactStatus {
            configured: true,
            upstream: Some(UpstreamStatus::Reachable { status }),
        }
    }

    #[test]
    fn probe_status_codes() {
        for (status, expected) in [
            (
                ContactStatus {
                    configured: false,
                    upstream: None,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ContactStatus {
                    configured: true,
                    upstream: Some(UpstreamStatus::Unreachable),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (reachable(200), StatusCode::OK),
            (reachable(204), StatusCode::OK),
            (reachable(301), StatusCode::BAD_GATEWAY),
            (reachable(404), StatusCode::NOT_FOUND),
            (reachable(503), StatusCode::SERVICE_UNAVAILABLE),
        ] {
            assert_eq!(status_code(&status), expected, "{status:?}");
        }
    }

    #[test]
    fn upstream_status_preserved() {
        let response = forwarded(ForwardingResult::new(
            422,
            UpstreamBody::Text("nope".into()),
        ));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = forwarded(ForwardingResult::new(201, UpstreamBody::Empty));
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
