use std::future::Future;

use jash_models::{
    contact::{ContactFields, FieldErrors},
    upstream::ForwardingResult,
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validate a submission and relay it to the upstream backend.
    fn submit(
        &self,
        fields: ContactFields,
    ) -> impl Future<Output = Result<ContactSubmitOutcome, ContactSubmitError>> + Send;

    /// Report whether the upstream is configured and reachable.
    fn status(&self) -> impl Future<Output = ContactStatus> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactSubmitOutcome {
    /// The submission reached the upstream, which answered with this result.
    Forwarded(ForwardingResult),
    /// The honeypot was filled in. Nothing was sent.
    Deflected,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The submission is invalid.")]
    Validation(FieldErrors),
    #[error("No upstream is configured.")]
    NotConfigured,
    #[error("The upstream did not respond in time.")]
    Timeout,
    #[error(transparent)]
    Network(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStatus {
    pub configured: bool,
    /// `None` if the upstream is not configured
    pub upstream: Option<UpstreamStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    /// The upstream answered with this HTTP status code.
    Reachable { status: u16 },
    Unreachable,
}

impl ContactStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self.upstream, Some(UpstreamStatus::Reachable { status }) if (200..300).contains(&status))
    }
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(
        mut self,
        fields: ContactFields,
        result: Result<ContactSubmitOutcome, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(fields))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_status(mut self, status: ContactStatus) -> Self {
        self.expect_status()
            .once()
            .return_once(move || Box::pin(std::future::ready(status)));
        self
    }
}
