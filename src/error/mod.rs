//! Error types and response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::store::StoreError;
use crate::uploads::UploadError;

/// Per-field validation failures, keyed by the offending field name.
///
/// Serializes as a flat `{"field": "reason"}` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    /// A map with a single entry.
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, reason);
        errors
    }

    /// Records a failure for `field`. The first reason recorded wins.
    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| reason.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded reason for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

/// Service error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields failed validation (400)
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The request body could not be decoded at all (400)
    #[error("malformed request: {0}")]
    BadRequest(String),

    /// A record with the same name already exists (409)
    #[error("'{0}' already exists.")]
    DuplicateName(String),

    /// The requested resource does not exist (404)
    #[error("not found")]
    NotFound,

    /// Record store failure (500)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Image storage failure (500)
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
            Self::DuplicateName(ref name) => {
                tracing::debug!(name = %name, "rejected duplicate animal name");
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "message": self.to_string() })),
                )
                    .into_response()
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "not found" })),
            )
                .into_response(),
            Self::Store(err) => {
                tracing::error!(error = %err, "record store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "storage failure" })),
                )
                    .into_response()
            }
            Self::Upload(err) => {
                tracing::error!(error = %err, "image storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "storage failure" })),
                )
                    .into_response()
            }
        }
    }
}
