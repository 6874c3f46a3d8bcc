//! Payload validation
//!
//! Converts an untyped key/value payload into a [`NewAnimal`], or fails with
//! a field→reason map. Unknown fields and caller-supplied values for
//! server-assigned fields (`id`, `timestamp`, `imageUrl`) are ignored.

use serde_json::{Map, Value};

use super::model::NewAnimal;
use crate::error::FieldErrors;

/// Validation failure reasons, as surfaced in the 400 response body.
pub mod reason {
    pub const MISSING: &str = "missing required field";
    pub const WRONG_TYPE: &str = "expected a string";
    pub const EMPTY: &str = "must not be empty";
}

/// Fields the caller must supply.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "description", "animalClassification"];

/// Validates an untyped payload into the normalized record shape.
///
/// # Errors
///
/// Returns the accumulated per-field failures; an error here means nothing
/// was or will be written.
pub fn validate_payload(payload: &Map<String, Value>) -> Result<NewAnimal, FieldErrors> {
    let mut errors = FieldErrors::default();

    let mut take = |field: &str| -> Option<String> {
        match payload.get(field) {
            None | Some(Value::Null) => {
                errors.push(field, reason::MISSING);
                None
            }
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                errors.push(field, reason::WRONG_TYPE);
                None
            }
        }
    };

    let name = take("name");
    let description = take("description");
    let animal_classification = take("animalClassification");

    if let Some(name) = &name {
        if name.trim().is_empty() {
            errors.push("name", reason::EMPTY);
        }
    }

    match (name, description, animal_classification) {
        (Some(name), Some(description), Some(animal_classification)) if errors.is_empty() => {
            Ok(NewAnimal {
                name,
                description,
                animal_classification,
            })
        }
        _ => Err(errors),
    }
}
