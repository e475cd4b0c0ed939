use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_models::contact::{ContactSubmission, ContactValidationError};
use tracing::warn;

use super::{error, internal_server_error};
use crate::models::contact::{ApiContactSubmission, ApiContactSuccess};

pub const RELAY_PATH: &str = "/api/send-email";

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route(
            RELAY_PATH,
            routing::post(send_message)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(service)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    body: Result<Json<ApiContactSubmission>, JsonRejection>,
) -> Response {
    let body = body.map(|Json(body)| body).unwrap_or_else(|err| {
        warn!(error = %err, "Rejected unreadable contact request body");
        ApiContactSubmission::default()
    });

    let submission = match ContactSubmission::try_from(body) {
        Ok(submission) => submission,
        Err(err) => {
            warn!(?err, "Rejected invalid contact submission");
            return validation_error(err);
        }
    };

    match service.send_message(submission).await {
        Ok(()) => Json(ApiContactSuccess::default()).into_response(),
        Err(ContactSendMessageError::NotConfigured) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Email service not configured",
            Some("Please contact the site administrator"),
        ),
        Err(ContactSendMessageError::Send) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send email",
            Some("Please try again later or contact me directly"),
        ),
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}

fn validation_error(err: ContactValidationError) -> Response {
    let (message, details) = match err {
        ContactValidationError::MissingFields => (
            "Missing required fields",
            Some("Name, email, and message are required"),
        ),
        ContactValidationError::InvalidEmail => ("Invalid email format", None),
        ContactValidationError::MessageTooShort => (
            "Message too short",
            Some("Please provide a more detailed message"),
        ),
        ContactValidationError::NameTooLong => ("Name too long", Some("Please use a shorter name")),
        ContactValidationError::MessageTooLong => {
            ("Message too long", Some("Please shorten your message"))
        }
    };

    error(StatusCode::BAD_REQUEST, message, details)
}
