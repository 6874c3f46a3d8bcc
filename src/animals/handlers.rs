//! HTTP handlers for `/animals/`

use axum::{extract::State, http::StatusCode, Json};

use super::extract::AnimalSubmission;
use super::model::AnimalRecord;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /animals/` — all records, newest-first.
pub async fn list_animals(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimalRecord>>, ApiError> {
    Ok(Json(state.service().list().await?))
}

/// `POST /animals/` — create a record from a JSON body or multipart form.
pub async fn create_animal(
    State(state): State<AppState>,
    submission: AnimalSubmission,
) -> Result<(StatusCode, Json<AnimalRecord>), ApiError> {
    let record = state
        .service()
        .create(&submission.payload, submission.image)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}
