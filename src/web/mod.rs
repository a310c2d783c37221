//! HTTP surface of the profile tab
//!
//! Maps the host's group routes onto the [`GroupExtension`] lifecycle:
//! - display and edit screens render HTML,
//! - saves answer `303 See Other` or re-render the form,
//! - failures come back as a JSON `{ error, code }` body.
//!
//! [`GroupExtension`]: crate::extension::GroupExtension

pub mod flash;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;

use crate::core::FieldsError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Header carrying the id of the signed-in member
pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Fields(FieldsError),
    Input(String),
    NotFound(String),
    Forbidden(String),
    Internal(String),
}

impl From<FieldsError> for WebError {
    fn from(err: FieldsError) -> Self {
        WebError::Fields(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Fields(FieldsError::GroupNotFound(slug)) => (
                StatusCode::NOT_FOUND,
                format!("Group '{}' not found", slug),
                "not_found".to_string(),
            ),
            WebError::Fields(err @ FieldsError::FieldNotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string(), "not_found".to_string())
            }
            WebError::Fields(err @ FieldsError::Rejected { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                "rejected".to_string(),
            ),
            WebError::Fields(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                "fields_error".to_string(),
            ),

            WebError::Input(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                "input_error".to_string(),
            ),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found".to_string()),
            WebError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "forbidden".to_string()),
            WebError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "internal_error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
