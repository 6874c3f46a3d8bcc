//! Image intake and serving
//!
//! Uploaded images are accepted only when their filename carries an
//! extension from [`ALLOWED_EXTENSIONS`]. Accepted files are written under a
//! collision-resistant UUID name that preserves the original extension, and
//! the returned URL points at the stored name. A disallowed or absent file is
//! not an error; callers fall back to the configured default image URL.

use axum::{
    extract::{Path as UrlPath, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::UploadSettings;
use crate::error::ApiError;
use crate::state::AppState;

/// File extensions accepted for image upload, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Image storage error type
#[derive(Debug, Error)]
pub enum UploadError {
    /// The configured upload path exists but is not a directory
    #[error("upload path {0} is not a directory")]
    InvalidPath(String),

    /// Filesystem failure while writing or reading an image
    #[error("image i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded file as received from the request, prior to any checks.
#[derive(Debug, Clone)]
pub struct RawUpload {
    /// Filename as declared by the client
    pub filename: String,
    /// File contents
    pub data: Bytes,
}

/// Filesystem-backed image store
///
/// Files are stored flat under the configured directory. Stored names are
/// generated, never caller-supplied, so this path cannot overwrite an
/// existing file.
#[derive(Debug, Clone)]
pub struct ImageStore {
    directory: PathBuf,
    public_base: String,
    default_image_url: String,
}

impl ImageStore {
    /// Creates an image store over the configured directory.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidPath`] if the path exists and is not a
    /// directory. The directory itself is created at startup, not here.
    pub fn new(settings: &UploadSettings) -> Result<Self, UploadError> {
        if settings.directory.exists() && !settings.directory.is_dir() {
            return Err(UploadError::InvalidPath(
                settings.directory.display().to_string(),
            ));
        }

        Ok(Self {
            directory: settings.directory.clone(),
            public_base: settings.public_base.trim_end_matches('/').to_string(),
            default_image_url: settings.default_image_url.clone(),
        })
    }

    /// URL used for records created without a usable image.
    #[must_use]
    pub fn default_image_url(&self) -> &str {
        &self.default_image_url
    }

    /// Stores an uploaded image and returns its public URL.
    ///
    /// Returns `Ok(None)` when the filename's extension is not in the
    /// allow-list; that is a silent fallback, not a failure. A partial file
    /// left by a failed write is removed before the error propagates, so no
    /// returned URL ever references an incomplete file.
    pub async fn store(&self, upload: &RawUpload) -> Result<Option<String>, UploadError> {
        let clean = sanitize_filename(&upload.filename);
        let Some(ext) = extension(&clean).filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        else {
            tracing::debug!(filename = %upload.filename, "upload rejected by extension allow-list");
            return Ok(None);
        };

        let stored_name = format!("{}.{ext}", Uuid::new_v4());
        let path = self.directory.join(&stored_name);

        if let Err(err) = write_file(&path, &upload.data).await {
            let _ = fs::remove_file(&path).await;
            return Err(err.into());
        }

        tracing::debug!(
            original = %upload.filename,
            stored = %stored_name,
            size = upload.data.len(),
            "stored uploaded image"
        );

        Ok(Some(format!("{}/{stored_name}", self.public_base)))
    }

    /// Reads a stored image by its generated name.
    ///
    /// Returns `Ok(None)` for absent files and for names that attempt to
    /// escape the upload directory.
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, UploadError> {
        if filename.contains(['/', '\\']) || filename.contains("..") {
            return Ok(None);
        }

        match fs::read(self.directory.join(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(UploadError::Io(err)),
        }
    }
}

async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.flush().await?;
    Ok(())
}

/// Strips path components and unsafe characters from a client filename.
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// The lowercase extension of `filename`, if it has one.
fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

fn content_type_for(filename: &str) -> mime::Mime {
    match extension(filename).as_deref() {
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Handler for `GET /uploads/{filename}`.
///
/// Serves a previously stored image by its generated name; 404 when absent.
pub async fn serve_upload(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, ApiError> {
    let Some(bytes) = state.images().read(&filename).await? else {
        return Err(ApiError::NotFound);
    };

    let content_type = content_type_for(&filename);
    Ok(([(header::CONTENT_TYPE, content_type.to_string())], bytes).into_response())
}
