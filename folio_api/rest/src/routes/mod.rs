use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiError;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
        Some("Please try again later"),
    )
}

fn error(code: StatusCode, error: &'static str, details: Option<&'static str>) -> Response {
    (code, Json(ApiError { error, details })).into_response()
}
