use std::future::Future;

use anyhow::Context;
use jash_models::contact::ContactFields;
use url::Url;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Post the form fields to the contact endpoint.
    ///
    /// Any HTTP reply, successful or not, is returned as `Ok`. Errors are
    /// reserved for requests that never got a reply.
    fn send(
        &self,
        fields: &ContactFields,
    ) -> impl Future<Output = anyhow::Result<ContactApiResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactApiResponse {
    pub status: u16,
    pub body: String,
}

impl ContactApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct HttpContactApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpContactApi {
    pub fn new(endpoint: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build http client")?;
        Ok(Self { client, endpoint })
    }
}

impl ContactApi for HttpContactApi {
    async fn send(&self, fields: &ContactFields) -> anyhow::Result<ContactApiResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(fields)
            .send()
            .await
            .context("Failed to send contact form")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read contact form response")?;

        Ok(ContactApiResponse { status, body })
    }
}

#[cfg(any(test, feature = "mock"))]
impl MockContactApi {
    pub fn with_send(mut self, fields: ContactFields, response: ContactApiResponse) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(fields))
            .return_once(move |_| Box::pin(std::future::ready(Ok(response))));
        self
    }
}
