use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

/// Deliberately loose `local@domain.tld` shape check.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A contact form submission that passed validation.
///
/// Submissions have no identity: two identical submissions are two independent
/// messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}

#[nutype(
    validate(predicate = |name: &str| !name.trim().is_empty(), len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX, len_char_max = 254),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    validate(
        predicate = |message: &str| !message.trim().is_empty(),
        len_char_min = 10,
        len_char_max = 5000,
    ),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub const MIN_LENGTH: usize = 10;
}

/// Reason a submission was rejected. Checks run in declaration order and stop at
/// the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please provide a more detailed message (at least 10 characters).")]
    MessageTooShort,
    #[error("Please use a shorter name.")]
    NameTooLong,
    #[error("Please shorten your message.")]
    MessageTooLong,
}

impl ContactSubmission {
    /// Validate raw form field values.
    ///
    /// Field values are kept as entered; trimming only decides whether a field
    /// counts as empty.
    pub fn validate(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ContactValidationError> {
        let (name, email, message) = (name.into(), email.into(), message.into());

        if [&name, &email, &message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ContactValidationError::MissingFields);
        }

        let email =
            ContactEmail::try_new(email).map_err(|_| ContactValidationError::InvalidEmail)?;

        // Counted in chars, not UTF-16 units: five emoji are too short.
        if message.chars().count() < ContactMessage::MIN_LENGTH {
            return Err(ContactValidationError::MessageTooShort);
        }

        let name = ContactName::try_new(name).map_err(|_| ContactValidationError::NameTooLong)?;
        let message =
            ContactMessage::try_new(message).map_err(|_| ContactValidationError::MessageTooLong)?;

        Ok(Self {
            name,
            email,
            message,
        })
    }
}
