//! Process-local record store

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::{AnimalStore, StoreError};
use crate::animals::model::AnimalRecord;

/// In-process store; records live for the process lifetime.
///
/// Records are keyed by lowercase name, which makes the uniqueness check and
/// the insert a single operation under one write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, AnimalRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnimalStore for MemoryStore {
    async fn insert_unique(&self, record: &AnimalRecord) -> Result<bool, StoreError> {
        let mut records = self.records.write();
        match records.entry(record.name.to_lowercase()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(true)
            }
        }
    }

    async fn list(&self) -> Result<Vec<AnimalRecord>, StoreError> {
        let records = self.records.read();
        let mut all: Vec<AnimalRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(all)
    }
}
