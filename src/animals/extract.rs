//! Request extraction for animal creation
//!
//! `POST /animals/` accepts either a JSON object or a multipart form. Both
//! arrive here as the same untyped payload shape, plus an optional file from
//! the form's `imageUrl` part, so the rest of the creation flow is agnostic
//! to the transport.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};
use crate::uploads::RawUpload;

/// Name of the multipart file part, mirroring the wire field it fills.
const IMAGE_PART: &str = "imageUrl";

/// The decoded body of a create request.
#[derive(Debug, Default)]
pub struct AnimalSubmission {
    /// Untyped field values, validated later by the record service
    pub payload: Map<String, Value>,

    /// Uploaded image, when the request was multipart and carried one
    pub image: Option<RawUpload>,
}

impl<S> FromRequest<S> for AnimalSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|err| ApiError::BadRequest(err.to_string()))?;
            return from_multipart(multipart).await;
        }

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;

        match body {
            Value::Object(payload) => Ok(Self {
                payload,
                image: None,
            }),
            _ => Err(ApiError::Validation(FieldErrors::single(
                "body",
                "expected a JSON object",
            ))),
        }
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<AnimalSubmission, ApiError> {
    let mut submission = AnimalSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_owned);

        if name == IMAGE_PART {
            if let Some(filename) = file_name.filter(|f| !f.is_empty()) {
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::BadRequest(err.to_string()))?;
                // An empty part means the form had the field but no file
                if !data.is_empty() {
                    submission.image = Some(RawUpload { filename, data });
                }
                continue;
            }
            // No filename: fall through and treat it as a text field, which
            // validation then ignores as a server-assigned field
        }

        let text = field.text().await.map_err(|_| {
            ApiError::Validation(FieldErrors::single(
                name.as_str(),
                super::validate::reason::WRONG_TYPE,
            ))
        })?;
        submission.payload.insert(name, Value::String(text));
    }

    Ok(submission)
}
