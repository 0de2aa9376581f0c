use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::macros::nutype_string;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 254;
pub const CATEGORY_MAX_LEN: usize = 60;
pub const MESSAGE_MAX_LEN: usize = 3000;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email.";

pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Unvalidated form data exactly as submitted by the client.
///
/// Missing fields deserialize to the empty string, so validation can report
/// them individually instead of failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default, deserialize_with = "jash_utils::serde::lenient_string::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "jash_utils::serde::lenient_string::deserialize")]
    pub email: String,
    #[serde(default, deserialize_with = "jash_utils::serde::lenient_string::deserialize")]
    pub category: String,
    #[serde(default, deserialize_with = "jash_utils::serde::lenient_string::deserialize")]
    pub message: String,
    /// Hidden honeypot field, left empty by humans
    #[serde(
        default,
        deserialize_with = "jash_utils::serde::lenient_string::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub website: String,
}

/// A contact submission that passed validation. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub category: ContactCategory,
    pub message: ContactMessage,
}

nutype_string!(ContactName(
    sanitize(trim),
    validate(not_empty, len_char_max = 100)
));

nutype_string!(ContactEmail(
    sanitize(trim),
    validate(len_char_max = 254, regex = EMAIL_REGEX)
));

nutype_string!(ContactCategory(
    sanitize(trim),
    validate(not_empty, len_char_max = 60)
));

nutype_string!(ContactMessage(
    sanitize(trim),
    validate(not_empty, len_char_max = 3000)
));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Category,
    Message,
    Website,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Category => "category",
            Self::Message => "message",
            Self::Website => "website",
        }
    }
}

/// Human readable validation errors keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<ContactField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: ContactField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: ContactField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, &str)> {
        self.0.iter().map(|(&field, message)| (field, message.as_str()))
    }
}

pub fn too_long_message(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

impl From<ContactSubmission> for ContactFields {
    fn from(value: ContactSubmission) -> Self {
        Self {
            name: value.name.into_inner(),
            email: value.email.into_inner(),
            category: value.category.into_inner(),
            message: value.message.into_inner(),
            website: String::new(),
        }
    }
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Category => &self.category,
            ContactField::Message => &self.message,
            ContactField::Website => &self.website,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Category => self.category = value,
            ContactField::Message => self.message = value,
            ContactField::Website => self.website = value,
        }
    }

    /// Whether the hidden honeypot field has been filled in.
    pub fn is_spam(&self) -> bool {
        !self.website.trim().is_empty()
    }

    /// Trim and check every field, reporting all problems at once.
    ///
    /// Over-long values are rejected, never truncated.
    pub fn validate(&self) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = check(
            &mut errors,
            ContactField::Name,
            &self.name,
            NAME_MAX_LEN,
            |value| ContactName::try_new(value),
        );
        let email = check(
            &mut errors,
            ContactField::Email,
            &self.email,
            EMAIL_MAX_LEN,
            |value| ContactEmail::try_new(value),
        );
        let category = check(
            &mut errors,
            ContactField::Category,
            &self.category,
            CATEGORY_MAX_LEN,
            |value| ContactCategory::try_new(value),
        );
        let message = check(
            &mut errors,
            ContactField::Message,
            &self.message,
            MESSAGE_MAX_LEN,
            |value| ContactMessage::try_new(value),
        );

        match (name, email, category, message) {
            (Some(name), Some(email), Some(category), Some(message)) if errors.is_empty() => {
                Ok(ContactSubmission {
                    name,
                    email,
                    category,
                    message,
                })
            }
            _ => Err(errors),
        }
    }
}

fn check<T, E>(
    errors: &mut FieldErrors,
    field: ContactField,
    value: &str,
    max_len: usize,
    parse: impl FnOnce(String) -> Result<T, E>,
) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, REQUIRED_MESSAGE);
        return None;
    }
    if value.chars().count() > max_len {
        errors.insert(field, too_long_message(max_len));
        return None;
    }

    match parse(value.to_owned()) {
        Ok(value) => Some(value),
        Err(_) if field == ContactField::Email => {
            errors.insert(field, INVALID_EMAIL_MESSAGE);
            None
        }
        Err(_) => {
            errors.insert(field, "Enter a valid value.");
            None
        }
    }
}
