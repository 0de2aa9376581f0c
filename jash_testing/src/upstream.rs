//! A fake backend API accepting contact submissions

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

pub const CONTACT_ROUTE: &str = "/api/contact/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Behavior {
    /// Answer `201 Created` with a JSON body
    Accept,
    /// Answer `400 Bad Request` with field errors
    Reject,
    /// Answer `500 Internal Server Error` with an HTML body
    Fail,
    /// Answer `200 OK` with a plain text body
    Text,
    /// Answer `200 OK` with an empty body
    Empty,
    /// Wait for the configured delay before accepting
    Hang,
}

#[derive(Debug)]
struct ServerState {
    behavior: Behavior,
    delay: Duration,
    received: Mutex<Vec<Value>>,
}

/// A fake upstream running in the background of the current tokio runtime.
#[derive(Debug)]
pub struct FakeUpstream {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl FakeUpstream {
    /// Bind to an ephemeral port on localhost and start serving.
    pub async fn spawn(behavior: Behavior) -> anyhow::Result<Self> {
        Self::spawn_with_delay(behavior, Duration::from_secs(60)).await
    }

    pub async fn spawn_with_delay(behavior: Behavior, delay: Duration) -> anyhow::Result<Self> {
        let state = Arc::new(ServerState {
            behavior,
            delay,
            received: Mutex::default(),
        });

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .context("Failed to bind fake upstream")?;
        let addr = listener.local_addr()?;

        let router = router(Arc::clone(&state));
        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self { addr, state })
    }

    pub fn url(&self) -> Url {
        format!("http://{}/", self.addr)
            .parse()
            .expect("socket address is a valid url host")
    }

    /// The JSON bodies of all submissions received so far.
    pub fn received(&self) -> Vec<Value> {
        self.state.received.lock().unwrap().clone()
    }
}

pub async fn start_server(
    host: IpAddr,
    port: u16,
    behavior: Behavior,
    delay: Duration,
) -> anyhow::Result<()> {
    info!("Starting fake contact backend on {host}:{port}");
    info!("Contact endpoint: http://{host}:{port}{CONTACT_ROUTE}");
    info!("Behavior: {behavior:?}");

    let state = Arc::new(ServerState {
        behavior,
        delay,
        received: Mutex::default(),
    });

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(state))
        .await
        .context("Failed to start HTTP server")
}

fn router(state: Arc<ServerState>) -> Router<()> {
    Router::new()
        .route("/", routing::get(health))
        .route(CONTACT_ROUTE, routing::post(contact))
        .with_state(state)
}

async fn health(state: State<Arc<ServerState>>) -> Response {
    match state.behavior {
        Behavior::Fail => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => Json(json!({ "status": "ok" })).into_response(),
    }
}

async fn contact(state: State<Arc<ServerState>>, Json(body): Json<Value>) -> Response {
    let id = {
        let mut received = state.received.lock().unwrap();
        received.push(body);
        received.len()
    };

    match state.behavior {
        Behavior::Accept => {
            (StatusCode::CREATED, Json(json!({ "id": id, "ok": true }))).into_response()
        }
        Behavior::Reject => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "email": ["Enter a valid email address."] })),
        )
            .into_response(),
        Behavior::Fail => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/html")],
            "<h1>Server Error (500)</h1>",
        )
            .into_response(),
        Behavior::Text => "Thanks for reaching out!".into_response(),
        Behavior::Empty => StatusCode::OK.into_response(),
        Behavior::Hang => {
            tokio::time::sleep(state.delay).await;
            (StatusCode::CREATED, Json(json!({ "id": id, "ok": true }))).into_response()
        }
    }
}
