//! Redis-backed record store
//!
//! Each record lives in a hash at `animal:{id}` with one string field per
//! record field. Name uniqueness is enforced through a claim key
//! `animal-name:{lowercase}` written with `SET NX`, which makes the
//! duplicate check and the reservation a single atomic step.

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use std::collections::HashMap;

use super::{AnimalStore, StoreError};
use crate::animals::model::AnimalRecord;

/// Redis store; record lifetime follows the external store's persistence
/// policy, which this service treats as a black box.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Creates a store over a connection pool for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PoolSetup`] when the URL is rejected or the
    /// pool cannot be configured. Connectivity itself is verified lazily on
    /// first use.
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = Config::from_url(url).create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }
}

fn record_key(id: &str) -> String {
    format!("animal:{id}")
}

fn name_key(name: &str) -> String {
    format!("animal-name:{}", name.to_lowercase())
}

fn record_from_hash(
    key: &str,
    mut fields: HashMap<String, String>,
) -> Result<AnimalRecord, StoreError> {
    let mut take = |name: &str| {
        fields
            .remove(name)
            .ok_or_else(|| StoreError::Corrupt(format!("{key} is missing field {name}")))
    };

    Ok(AnimalRecord {
        id: take("id")?,
        name: take("name")?,
        description: take("description")?,
        animal_classification: take("animalClassification")?,
        image_url: take("imageUrl")?,
        timestamp: take("timestamp")?,
    })
}

#[async_trait]
impl AnimalStore for RedisStore {
    async fn insert_unique(&self, record: &AnimalRecord) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        // SET NX on the name key is the uniqueness point; losing the race
        // here means some other writer owns the name.
        let claimed: bool = conn.set_nx(name_key(&record.name), &record.id).await?;
        if !claimed {
            return Ok(false);
        }

        let fields = [
            ("id", record.id.as_str()),
            ("name", record.name.as_str()),
            ("description", record.description.as_str()),
            ("animalClassification", record.animal_classification.as_str()),
            ("imageUrl", record.image_url.as_str()),
            ("timestamp", record.timestamp.as_str()),
        ];

        let written: Result<(), _> = conn
            .hset_multiple(record_key(&record.id), &fields)
            .await;
        if let Err(err) = written {
            // Release the claim so the name is creatable again
            let released: Result<(), _> = conn.del(name_key(&record.name)).await;
            if let Err(release_err) = released {
                tracing::error!(
                    name = %record.name,
                    error = %release_err,
                    "failed to release name claim after write failure"
                );
            }
            return Err(err.into());
        }

        Ok(true)
    }

    async fn list(&self) -> Result<Vec<AnimalRecord>, StoreError> {
        let mut conn = self.pool.get().await?;

        let keys: Vec<String> = conn.keys("animal:*").await?;
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let fields: HashMap<String, String> = conn.hgetall(&key).await?;
            if fields.is_empty() {
                // Key expired between KEYS and HGETALL
                continue;
            }
            records.push(record_from_hash(&key, fields)?);
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}
