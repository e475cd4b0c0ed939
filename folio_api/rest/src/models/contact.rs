use folio_models::contact::{ContactSubmission, ContactValidationError};
use serde::{Deserialize, Serialize};

/// Raw relay request body. Fields are optional so that absent fields are
/// reported as missing instead of as a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl TryFrom<ApiContactSubmission> for ContactSubmission {
    type Error = ContactValidationError;

    fn try_from(value: ApiContactSubmission) -> Result<Self, Self::Error> {
        ContactSubmission::validate(
            value.name.unwrap_or_default(),
            value.email.unwrap_or_default(),
            value.message.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactSuccess {
    pub success: bool,
    pub message: &'static str,
}

impl Default for ApiContactSuccess {
    fn default() -> Self {
        Self {
            success: true,
            message: "Email sent successfully",
        }
    }
}
