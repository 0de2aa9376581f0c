//! Client side of the contact form
//!
//! [`ContactForm`] holds the field values and drives a submission through
//! the states `Idle → Submitting → Success | Error`. It talks to the contact
//! proxy through a [`ContactApi`](api::ContactApi).

pub use form::{ContactForm, FormState, SubmitError};

pub mod api;
pub mod error_message;
mod form;
