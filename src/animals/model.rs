//! Animal record types

use serde::{Deserialize, Serialize};

/// A single animal entry.
///
/// `id` and `timestamp` are server-assigned at creation and never change;
/// caller-supplied values for them are ignored. Names are unique across all
/// records, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRecord {
    /// Server-generated UUID
    pub id: String,

    /// Display name; case-insensitively unique
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Free-text classification, e.g. "Feline"
    pub animal_classification: String,

    /// URL of the animal's image, or the configured default
    pub image_url: String,

    /// ISO-8601 UTC creation time
    pub timestamp: String,
}

/// The caller-supplied portion of a record, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnimal {
    pub name: String,
    pub description: String,
    pub animal_classification: String,
}
