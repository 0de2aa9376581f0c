use std::{sync::Arc, time::Duration};

use anyhow::Context;
use jash_extern_contracts::upstream::{UpstreamApiService, UpstreamError};
use jash_models::{
    contact::ContactSubmission,
    upstream::{ForwardingResult, UpstreamBody},
};
use reqwest::header;
use tracing::{debug, warn};
use url::Url;

use crate::http::HttpClient;

const CONTACT_PATH: &str = "api/contact/";

#[derive(Debug, Clone)]
pub struct UpstreamApiServiceImpl {
    config: UpstreamApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct UpstreamApiServiceConfig {
    base_url: Arc<Url>,
    contact_url: Arc<Url>,
    timeout: Duration,
}

impl UpstreamApiServiceConfig {
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = with_trailing_slash(base_url);
        let contact_url = base_url
            .join(CONTACT_PATH)
            .context("Failed to build upstream contact url")?;

        Ok(Self {
            base_url: base_url.into(),
            contact_url: contact_url.into(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl UpstreamApiServiceImpl {
    pub fn new(config: UpstreamApiServiceConfig, client: HttpClient) -> Self {
        Self { config, client }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ForwardingResult, UpstreamError> {
        let response = request
            .timeout(self.config.timeout)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(map_error)?;

        let status = response.status().as_u16();
        let raw = response.text().await.map_err(map_error)?;

        debug!(status, len = raw.len(), "received upstream response");

        Ok(ForwardingResult::new(status, UpstreamBody::parse(raw)))
    }
}

impl UpstreamApiService for UpstreamApiServiceImpl {
    async fn forward(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ForwardingResult, UpstreamError> {
        let request = self
            .client
            .post((*self.config.contact_url).clone())
            .json(submission);
        self.send(request).await
    }

    async fn probe(&self) -> Result<ForwardingResult, UpstreamError> {
        let request = self.client.get((*self.config.base_url).clone());
        self.send(request).await
    }
}

fn map_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        warn!("upstream request timed out");
        UpstreamError::Timeout
    } else {
        UpstreamError::Network(anyhow::Error::new(err).context("Failed to reach upstream"))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
