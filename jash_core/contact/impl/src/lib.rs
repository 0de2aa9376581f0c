use std::{sync::Arc, time::Duration};

use jash_core_contact_contracts::{
    ContactService, ContactStatus, ContactSubmitError, ContactSubmitOutcome, UpstreamStatus,
};
use jash_extern_contracts::upstream::{UpstreamApiService, UpstreamError};
use jash_models::contact::ContactFields;
use tokio::{sync::RwLock, time::Instant};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Upstream> {
    upstream: Option<Upstream>,
    config: ContactFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub status_cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    status: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: ContactStatus,
    timestamp: Instant,
}

impl<Upstream> ContactServiceImpl<Upstream> {
    /// `upstream` is `None` if no backend is configured, in which case every
    /// submission fails with [`ContactSubmitError::NotConfigured`].
    pub fn new(upstream: Option<Upstream>, config: ContactFeatureConfig) -> Self {
        Self {
            upstream,
            config,
            state: Default::default(),
        }
    }
}

impl<Upstream> ContactService for ContactServiceImpl<Upstream>
where
    Upstream: UpstreamApiService,
{
    async fn submit(
        &self,
        fields: ContactFields,
    ) -> Result<ContactSubmitOutcome, ContactSubmitError> {
        if fields.is_spam() {
            info!("honeypot field filled in, dropping submission");
            return Ok(ContactSubmitOutcome::Deflected);
        }

        let submission = fields.validate().map_err(ContactSubmitError::Validation)?;

        let Some(upstream) = &self.upstream else {
            error!("cannot forward contact submission: no upstream configured");
            return Err(ContactSubmitError::NotConfigured);
        };

        match upstream.forward(&submission).await {
            Ok(result) => {
                if result.ok {
                    info!(status = result.status, "contact submission forwarded");
                } else {
                    warn!(status = result.status, "upstream rejected contact submission");
                }
                Ok(ContactSubmitOutcome::Forwarded(result))
            }
            Err(UpstreamError::Timeout) => Err(ContactSubmitError::Timeout),
            Err(UpstreamError::Network(err)) => {
                error!("failed to forward contact submission: {err:#}");
                Err(ContactSubmitError::Network(err))
            }
        }
    }

    async fn status(&self) -> ContactStatus {
        let Some(upstream) = &self.upstream else {
            return ContactStatus {
                configured: false,
                upstream: None,
            };
        };

        let cache_guard = self.state.status.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| c.timestamp.elapsed() < self.config.status_cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.status.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| c.timestamp.elapsed() < self.config.status_cache_ttl)
        {
            return cached.status;
        }

        let upstream_status = match upstream.probe().await {
            Ok(result) => UpstreamStatus::Reachable {
                status: result.status,
            },
            Err(err) => {
                error!("Failed to probe upstream: {err:#}");
                UpstreamStatus::Unreachable
            }
        };

        let status = ContactStatus {
            configured: true,
            upstream: Some(upstream_status),
        };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: Instant::now(),
            })
            .status
    }
}
