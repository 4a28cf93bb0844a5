//! Record-level CRUD on top of [`CollectionStore`].
//!
//! Every mutation is a full read-modify-write of one collection. Mutations on
//! the same collection are serialized by a per-name mutex so two concurrent
//! `create` calls cannot compute the same id from a stale read. Mutations on
//! different collections never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::catalog::CollectionKind;
use crate::persistence::{next_id, record_id, CollectionStore, PersistenceError, Record};

pub struct EntityRepository {
    store: CollectionStore,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EntityRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    fn collection_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(name.to_string()).or_default().clone()
    }

    /// Every record of a collection, empty if it was never written or is unreadable.
    pub fn read_all(&self, name: &str) -> Vec<Record> {
        self.store.read_all(name)
    }

    /// First record whose `id` equals `id`.
    pub fn read_one(&self, name: &str, id: i64) -> Option<Record> {
        self.store
            .read_all(name)
            .into_iter()
            .find(|r| record_id(r) == Some(id))
    }

    pub fn count(&self, name: &str) -> usize {
        self.store.read_all(name).len()
    }

    /// Append `data` under a freshly assigned id and persist the collection.
    ///
    /// Any `id` already present in `data` is overwritten.
    pub fn create(&self, name: &str, mut data: Record) -> Result<Record, PersistenceError> {
        let lock = self.collection_lock(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.store.read_all(name);
        let id = next_id(name, &records)?;
        data.insert("id".to_string(), Value::from(id));
        records.push(data.clone());
        self.store.write_all(name, &records)?;

        tracing::debug!("Created record {} in '{}'", id, name);
        Ok(data)
    }

    /// Merge `partial` into the record with the given id.
    ///
    /// `null` values mean "leave unchanged" and the `id` key is ignored.
    /// Returns `Ok(None)` without writing when no such record exists.
    pub fn update(
        &self,
        name: &str,
        id: i64,
        partial: Record,
    ) -> Result<Option<Record>, PersistenceError> {
        self.modify(name, id, |record| {
            for (key, value) in partial {
                if key == "id" || value.is_null() {
                    continue;
                }
                record.insert(key, value);
            }
            Ok(())
        })
    }

    /// Apply `f` to the record with the given id and persist the collection.
    ///
    /// The collection lock is held for the whole read-modify-write. If `f`
    /// fails nothing is written. A changed `id` is restored before writing.
    pub fn modify<F>(&self, name: &str, id: i64, f: F) -> Result<Option<Record>, PersistenceError>
    where
        F: FnOnce(&mut Record) -> Result<(), PersistenceError>,
    {
        let lock = self.collection_lock(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.store.read_all(name);
        let Some(record) = records.iter_mut().find(|r| record_id(r) == Some(id)) else {
            return Ok(None);
        };

        f(record)?;
        record.insert("id".to_string(), Value::from(id));
        let updated = record.clone();
        self.store.write_all(name, &records)?;

        tracing::debug!("Updated record {} in '{}'", id, name);
        Ok(Some(updated))
    }

    /// Remove the record with the given id.
    ///
    /// Returns `Ok(false)` without writing when the id is absent, and
    /// [`PersistenceError::FloorViolation`] without writing when fewer than
    /// `min_items` records would remain.
    pub fn delete(&self, name: &str, id: i64, min_items: usize) -> Result<bool, PersistenceError> {
        let lock = self.collection_lock(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.store.read_all(name);
        let Some(pos) = records.iter().position(|r| record_id(r) == Some(id)) else {
            return Ok(false);
        };
        if records.len() - 1 < min_items {
            tracing::info!(
                "Rejected delete of {} from '{}': floor is {}",
                id,
                name,
                min_items
            );
            return Err(PersistenceError::FloorViolation {
                collection: name.to_string(),
                min_items,
            });
        }

        records.remove(pos);
        self.store.write_all(name, &records)?;

        tracing::debug!("Deleted record {} from '{}'", id, name);
        Ok(true)
    }

    /// Delete using the floor configured for `kind`.
    pub fn delete_kind(&self, kind: CollectionKind, id: i64) -> Result<bool, PersistenceError> {
        self.delete(kind.name(), id, kind.min_items())
    }

    /// Write `records` as a brand-new collection.
    ///
    /// Returns `Ok(false)` without writing when the collection already exists,
    /// checked under the collection lock so a concurrent `create` is never
    /// overwritten.
    pub fn create_collection(
        &self,
        name: &str,
        records: &[Record],
    ) -> Result<bool, PersistenceError> {
        let lock = self.collection_lock(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.store.exists(name) {
            return Ok(false);
        }
        self.store.write_all(name, records)?;
        Ok(true)
    }

    /// Overwrite a whole collection. Ids are taken as given and not re-checked.
    pub fn replace_all(&self, name: &str, records: &[Record]) -> Result<(), PersistenceError> {
        let lock = self.collection_lock(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.write_all(name, records)
    }
}
