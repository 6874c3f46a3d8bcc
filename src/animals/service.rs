//! Record creation and listing
//!
//! The service is the only writer to the record store. Creation is:
//! validate → resolve image URL → atomic insert-if-absent → respond.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::model::AnimalRecord;
use super::validate::validate_payload;
use crate::error::ApiError;
use crate::store::AnimalStore;
use crate::uploads::{ImageStore, RawUpload};

/// Orchestrates validation, image intake, and persistence.
pub struct AnimalService {
    store: Arc<dyn AnimalStore>,
    images: Arc<ImageStore>,
}

impl AnimalService {
    #[must_use]
    pub fn new(store: Arc<dyn AnimalStore>, images: Arc<ImageStore>) -> Self {
        Self { store, images }
    }

    /// Creates a record from an untyped payload and optional uploaded image.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] when required fields are missing or
    ///   malformed; the store is untouched.
    /// - [`ApiError::DuplicateName`] when the name is taken
    ///   (case-insensitively); nothing is written to the store.
    /// - [`ApiError::Upload`] / [`ApiError::Store`] on storage failure.
    pub async fn create(
        &self,
        payload: &Map<String, Value>,
        image: Option<RawUpload>,
    ) -> Result<AnimalRecord, ApiError> {
        let new_animal = validate_payload(payload).map_err(ApiError::Validation)?;

        // A file with a disallowed extension is "no image", not a failure
        let image_url = match &image {
            Some(upload) => self.images.store(upload).await?,
            None => None,
        }
        .unwrap_or_else(|| self.images.default_image_url().to_string());

        let record = AnimalRecord {
            id: Uuid::new_v4().to_string(),
            name: new_animal.name,
            description: new_animal.description,
            animal_classification: new_animal.animal_classification,
            image_url,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        if !self.store.insert_unique(&record).await? {
            return Err(ApiError::DuplicateName(record.name));
        }

        tracing::info!(id = %record.id, name = %record.name, "created animal record");
        Ok(record)
    }

    /// Returns all records, newest-first by creation time.
    pub async fn list(&self) -> Result<Vec<AnimalRecord>, ApiError> {
        Ok(self.store.list().await?)
    }
}
