//! Application state

use std::sync::Arc;

use crate::animals::AnimalService;
use crate::config::RegistryConfig;
use crate::store::AnimalStore;
use crate::uploads::{ImageStore, UploadError};

/// Shared state handed to every handler.
///
/// Cheap to clone; all components sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RegistryConfig>,
    images: Arc<ImageStore>,
    service: Arc<AnimalService>,
}

impl AppState {
    /// Wires the image store and record service over the given record store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured upload path is unusable.
    pub fn new(config: RegistryConfig, store: Arc<dyn AnimalStore>) -> Result<Self, UploadError> {
        let images = Arc::new(ImageStore::new(&config.uploads)?);
        let service = Arc::new(AnimalService::new(store, Arc::clone(&images)));

        Ok(Self {
            config: Arc::new(config),
            images,
            service,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    #[must_use]
    pub fn service(&self) -> &AnimalService {
        &self.service
    }
}
