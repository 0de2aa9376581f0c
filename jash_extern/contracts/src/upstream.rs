use std::future::Future;

use jash_models::{contact::ContactSubmission, upstream::ForwardingResult};
use thiserror::Error;

/// The backend API that ultimately processes contact submissions.
///
/// Every call is a single attempt bounded by a fixed timeout. Non-2xx replies
/// are reported as a [`ForwardingResult`], not as an error.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait UpstreamApiService: Send + Sync + 'static {
    /// Relay a validated submission to the backend.
    fn forward(
        &self,
        submission: &ContactSubmission,
    ) -> impl Future<Output = Result<ForwardingResult, UpstreamError>> + Send;

    /// Check whether the backend is reachable.
    fn probe(&self) -> impl Future<Output = Result<ForwardingResult, UpstreamError>> + Send;
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("The upstream did not respond in time.")]
    Timeout,
    #[error(transparent)]
    Network(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockUpstreamApiService {
    pub fn with_forward(
        mut self,
        submission: ContactSubmission,
        result: Result<ForwardingResult, UpstreamError>,
    ) -> Self {
        self.expect_forward()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_probe(mut self, result: Result<ForwardingResult, UpstreamError>) -> Self {
        self.expect_probe()
            .once()
            .return_once(move || Box::pin(std::future::ready(result)));
        self
    }
}
