//! Client side of the contact form: validation, transport selection and the
//! view-models rendered by the portfolio front end.

use folio_models::contact::{ContactSubmission, ContactValidationError};
use thiserror::Error;
use tracing::{error, info};

pub use self::transport::{ContactTransport, ContactTransportImpl};

pub mod emailjs;
pub mod form;
pub mod scene;
pub mod transport;

/// Validates form input and hands valid submissions to a transport.
#[derive(Debug, Clone)]
pub struct ContactDispatcher<Transport> {
    transport: Transport,
}

/// Why a submission did not go out. The [`Display`](std::fmt::Display) output
/// is the text shown next to the form.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Invalid(#[from] ContactValidationError),
    #[error("Email service not configured. Please contact me directly via the links above.")]
    NotConfigured,
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to send message. Please try again or contact me directly.")]
    Other(#[from] anyhow::Error),
}

impl<Transport: ContactTransport> ContactDispatcher<Transport> {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Validate the raw field values and, if they pass, make exactly one
    /// delivery attempt.
    pub async fn dispatch(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), DispatchError> {
        let submission = ContactSubmission::validate(name, email, message)?;

        self.transport
            .deliver(submission)
            .await
            .inspect(|_| info!("Contact message sent"))
            .inspect_err(|err| error!("Failed to send contact message: {err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;

    use super::*;
    use crate::transport::MockContactTransport;

    const MESSAGE: &str = "Hello, I'd like to discuss a project with you.";

    #[tokio::test]
    async fn ok() {
        // Arrange
        let transport = MockContactTransport::new().with_deliver(
            ContactSubmission::validate("Jane Doe", "jane@example.com", MESSAGE).unwrap(),
            Ok(()),
        );
        let sut = ContactDispatcher::new(transport);

        // Act
        let result = sut.dispatch("Jane Doe", "jane@example.com", MESSAGE).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn invalid_input_is_not_sent() {
        for (name, email, message, expected) in [
            ("", "jane@example.com", MESSAGE, ContactValidationError::MissingFields),
            ("Jane", "   ", MESSAGE, ContactValidationError::MissingFields),
            ("Jane", "jane@example.com", " \n", ContactValidationError::MissingFields),
            ("Jane", "foo@bar", MESSAGE, ContactValidationError::InvalidEmail),
            ("Jane", "jane@example.com", "Too short", ContactValidationError::MessageTooShort),
        ] {
            // Arrange
            let sut = ContactDispatcher::new(MockContactTransport::new());

            // Act
            let result = sut.dispatch(name, email, message).await;

            // Assert
            assert_matches!(result, Err(DispatchError::Invalid(err)) if *err == expected);
        }
    }

    #[tokio::test]
    async fn transport_failure() {
        // Arrange
        let transport = MockContactTransport::new().with_deliver(
            ContactSubmission::validate("Jane Doe", "jane@example.com", MESSAGE).unwrap(),
            Err(DispatchError::Rejected("Failed to send email".into())),
        );
        let sut = ContactDispatcher::new(transport);

        // Act
        let result = sut.dispatch("Jane Doe", "jane@example.com", MESSAGE).await;

        // Assert
        assert_matches!(result, Err(DispatchError::Rejected(msg)) if msg == "Failed to send email");
    }

    #[test]
    fn user_facing_messages() {
        assert_eq!(
            DispatchError::from(ContactValidationError::MissingFields).to_string(),
            "Please fill in all fields."
        );
        assert_eq!(
            DispatchError::NotConfigured.to_string(),
            "Email service not configured. Please contact me directly via the links above."
        );
        assert_eq!(
            DispatchError::Other(anyhow::anyhow!("connection refused")).to_string(),
            "Failed to send message. Please try again or contact me directly."
        );
    }
}
