use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use jash_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

mod errors;
mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// Origins allowed to make cross-origin requests. CORS is disabled if empty.
    pub allowed_origins: Arc<[HeaderValue]>,
    /// Request bodies larger than this are rejected with `413 Payload Too Large`.
    pub max_body_size: usize,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: RestServerConfig) -> Self {
        Self { contact, config }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Failed to start HTTP server")
    }

    pub fn router(self) -> Router<()> {
        let cors = cors_layer(&self.config.allowed_origins);

        let router = Router::new().merge(routes::contact::router(
            self.contact.into(),
            self.config.max_body_size,
        ));
        let router = match cors {
            Some(cors) => router.layer(cors),
            None => router,
        };

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::no_store::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

fn cors_layer(allowed_origins: &[HeaderValue]) -> Option<CorsLayer> {
    (!allowed_origins.is_empty()).then(|| {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed_origins.iter().cloned()))
            .allow_methods([Method::GET, Method::HEAD, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    })
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal, stopping http server"),
        Err(err) => tracing::error!("Failed to listen for shutdown signal: {err}"),
    }
}
