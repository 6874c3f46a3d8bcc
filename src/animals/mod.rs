//! Animal records: model, validation, creation flow, and HTTP handlers

pub mod extract;
pub mod handlers;
pub mod model;
pub mod service;
pub mod validate;

pub use model::{AnimalRecord, NewAnimal};
pub use service::AnimalService;
