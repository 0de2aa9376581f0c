use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use jash_models::contact::{
    ContactField, ContactFields, FieldErrors, INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{api::ContactApi, error_message::error_message};

pub const SUCCESS_MESSAGE: &str = "Your message has been sent successfully!";
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";
pub const NETWORK_MESSAGE: &str =
    "Could not reach the server.\nIf this keeps happening, the API may be down or misconfigured.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Success { message: String },
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("A submission is already in progress.")]
    AlreadySubmitting,
    #[error("The form contains invalid fields.")]
    Invalid(FieldErrors),
}

impl SubmitError {
    /// Short message to show next to the submit button.
    pub fn warning(&self) -> &'static str {
        match self {
            Self::AlreadySubmitting => "Please wait for the current submission to finish.",
            Self::Invalid(errors) if errors.iter().any(|(_, msg)| msg == REQUIRED_MESSAGE) => {
                "Please fill all fields!"
            }
            Self::Invalid(errors)
                if errors.get(ContactField::Email) == Some(INVALID_EMAIL_MESSAGE) =>
            {
                "Please enter a valid email address!"
            }
            Self::Invalid(_) => "Please check your input!",
        }
    }
}

/// State machine behind the contact form.
///
/// At most one submission is in flight at a time. A successful submission
/// clears the fields, a failed one keeps them so the user can retry.
#[derive(Debug)]
pub struct ContactForm<Api> {
    api: Api,
    timeout: Duration,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fields: ContactFields,
    state: FormState,
}

impl<Api: ContactApi> ContactForm<Api> {
    pub fn new(api: Api, timeout: Duration) -> Self {
        Self {
            api,
            timeout,
            inner: Default::default(),
        }
    }

    pub fn state(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn fields(&self) -> ContactFields {
        self.lock().fields.clone()
    }

    /// Update a field. Editing dismisses a previous success or error message.
    pub fn set_field(&self, field: ContactField, value: impl Into<String>) {
        let mut inner = self.lock();
        inner.fields.set(field, value);
        if matches!(inner.state, FormState::Success { .. } | FormState::Error { .. }) {
            inner.state = FormState::Idle;
        }
    }

    pub fn can_submit(&self) -> bool {
        let inner = self.lock();
        inner.state != FormState::Submitting && inner.fields.validate().is_ok()
    }

    /// Send the current fields and return the resulting state.
    pub async fn submit(&self) -> Result<FormState, SubmitError> {
        let fields = {
            let mut inner = self.lock();
            if inner.state == FormState::Submitting {
                return Err(SubmitError::AlreadySubmitting);
            }
            let submission = inner.fields.validate().map_err(SubmitError::Invalid)?;
            inner.state = FormState::Submitting;
            ContactFields {
                website: inner.fields.website.clone(),
                ..ContactFields::from(submission)
            }
        };

        let mut guard = SubmittingGuard {
            inner: &self.inner,
            done: false,
        };

        let state = match tokio::time::timeout(self.timeout, self.api.send(&fields)).await {
            Err(_) => {
                warn!(timeout = ?self.timeout, "contact request timed out");
                FormState::Error {
                    message: TIMEOUT_MESSAGE.into(),
                }
            }
            Ok(Err(err)) => {
                error!("failed to send contact request: {err:?}");
                FormState::Error {
                    message: NETWORK_MESSAGE.into(),
                }
            }
            Ok(Ok(response)) if response.is_success() => {
                info!(status = response.status, "contact request accepted");
                FormState::Success {
                    message: SUCCESS_MESSAGE.into(),
                }
            }
            Ok(Ok(response)) => {
                warn!(status = response.status, "contact request rejected");
                FormState::Error {
                    message: error_message(response.status, &response.body),
                }
            }
        };

        let mut inner = self.lock();
        if matches!(state, FormState::Success { .. }) {
            inner.fields = ContactFields::default();
        }
        inner.state = state.clone();
        guard.done = true;

        Ok(state)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the form to idle if a submission is dropped before it finishes.
struct SubmittingGuard<'a> {
    inner: &'a Mutex<Inner>,
    done: bool,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            lock(self.inner).state = FormState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use jash_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::{ContactApiResponse, MockContactApi};

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn fields() -> ContactFields {
        ContactFields {
            name: "Max Mustermann".into(),
            email: "max@example.de".into(),
            category: "General".into(),
            message: "Hello World!".into(),
            website: String::new(),
        }
    }

    fn form(api: MockContactApi) -> ContactForm<MockContactApi> {
        let form = ContactForm::new(api, TIMEOUT);
        let fields = fields();
        form.set_field(ContactField::Name, fields.name);
        form.set_field(ContactField::Email, fields.email);
        form.set_field(ContactField::Category, fields.category);
        form.set_field(ContactField::Message, fields.message);
        form
    }

    fn response(status: u16, body: &str) -> ContactApiResponse {
        ContactApiResponse {
            status,
            body: body.into(),
        }
    }

    #[tokio::test]
    async fn success_clears_fields() {
        // Arrange
        let api = MockContactApi::new().with_send(fields(), response(201, r#"{"ok":true}"#));
        let sut = form(api);
        assert!(sut.can_submit());

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result.unwrap(),
            FormState::Success {
                message: SUCCESS_MESSAGE.into()
            }
        );
        assert_eq!(sut.fields(), ContactFields::default());
        assert!(!sut.can_submit());
    }

    #[tokio::test]
    async fn sends_trimmed_fields() {
        // Arrange
        let api = MockContactApi::new().with_send(fields(), response(201, ""));
        let sut = ContactForm::new(api, TIMEOUT);
        sut.set_field(ContactField::Name, "  Max Mustermann\n");
        sut.set_field(ContactField::Email, " max@example.de ");
        sut.set_field(ContactField::Category, "General\t");
        sut.set_field(ContactField::Message, "\n Hello World! ");

        // Act
        let result = sut.submit().await;

        // Assert
        assert_matches!(result, Ok(FormState::Success { .. }));
    }

    #[tokio::test]
    async fn rejection_keeps_fields() {
        // Arrange
        let api = MockContactApi::new().with_send(
            fields(),
            response(400, r#"{"email":["Enter a valid email address."]}"#),
        );
        let sut = form(api);

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result.unwrap(),
            FormState::Error {
                message: "email: Enter a valid email address.".into()
            }
        );
        assert_eq!(sut.fields(), fields());
    }

    #[tokio::test]
    async fn network_error() {
        // Arrange
        let mut api = MockContactApi::new();
        api.expect_send()
            .once()
            .return_once(|_| Box::pin(std::future::ready(Err(anyhow::anyhow!("refused")))));
        let sut = form(api);

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result.unwrap(),
            FormState::Error {
                message: NETWORK_MESSAGE.into()
            }
        );
        assert_eq!(sut.fields(), fields());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout() {
        // Arrange
        let mut api = MockContactApi::new();
        api.expect_send().once().return_once(|_| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(response(201, ""))
            })
        });
        let sut = form(api);

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(
            result.unwrap(),
            FormState::Error {
                message: TIMEOUT_MESSAGE.into()
            }
        );
        assert_eq!(sut.fields(), fields());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_submission_rejected() {
        // Arrange
        let mut api = MockContactApi::new();
        api.expect_send().once().return_once(|_| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(response(201, ""))
            })
        });
        let sut = form(api);

        // Act
        let (first, second) = tokio::join!(sut.submit(), sut.submit());

        // Assert
        assert_matches!(first, Ok(FormState::Success { .. }));
        assert_matches!(second, Err(SubmitError::AlreadySubmitting));
    }

    #[tokio::test]
    async fn invalid_fields_not_sent() {
        // Arrange
        let sut = form(MockContactApi::new());
        sut.set_field(ContactField::Email, "not-an-email");

        // Act
        let result = sut.submit().await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.warning(), "Please enter a valid email address!");
        assert_eq!(sut.state(), FormState::Idle);

        sut.set_field(ContactField::Message, "");
        let err = sut.submit().await.unwrap_err();
        assert_eq!(err.warning(), "Please fill all fields!");
    }

    #[tokio::test]
    async fn editing_dismisses_message() {
        // Arrange
        let api = MockContactApi::new().with_send(fields(), response(500, ""));
        let sut = form(api);
        assert_eq!(
            sut.submit().await.unwrap(),
            FormState::Error {
                message: "Request failed (500)".into()
            }
        );

        // Act
        sut.set_field(ContactField::Message, "Hello again!");

        // Assert
        assert_eq!(sut.state(), FormState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submission_resets_state() {
        // Arrange
        let mut api = MockContactApi::new();
        api.expect_send().once().return_once(|_| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(response(201, ""))
            })
        });
        let sut = form(api);

        // Act
        let result = tokio::time::timeout(Duration::from_secs(1), sut.submit()).await;

        // Assert
        assert!(result.is_err());
        assert_eq!(sut.state(), FormState::Idle);
        assert_eq!(sut.fields(), fields());
    }
}
