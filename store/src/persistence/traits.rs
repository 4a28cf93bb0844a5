//! Async repository trait for callers running on an async runtime.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send`, which lets request handlers hold them
//! across `tokio::spawn`.

use super::{PersistenceError, Record};
use std::future::Future;

/// Uniform CRUD over named record collections.
///
/// Implementations must keep ids unique within a collection and must reject a
/// delete that would leave fewer than `min_items` records.
pub trait RecordRepository: Send + Sync {
    fn list_records(&self, collection: &str) -> impl Future<Output = Vec<Record>> + Send;
    fn get_record(
        &self,
        collection: &str,
        id: i64,
    ) -> impl Future<Output = Option<Record>> + Send;
    fn create_record(
        &self,
        collection: &str,
        data: Record,
    ) -> impl Future<Output = Result<Record, PersistenceError>> + Send;
    fn update_record(
        &self,
        collection: &str,
        id: i64,
        partial: Record,
    ) -> impl Future<Output = Result<Option<Record>, PersistenceError>> + Send;
    fn delete_record(
        &self,
        collection: &str,
        id: i64,
        min_items: usize,
    ) -> impl Future<Output = Result<bool, PersistenceError>> + Send;
}

impl RecordRepository for crate::repository::EntityRepository {
    async fn list_records(&self, collection: &str) -> Vec<Record> {
        self.read_all(collection)
    }

    async fn get_record(&self, collection: &str, id: i64) -> Option<Record> {
        self.read_one(collection, id)
    }

    async fn create_record(
        &self,
        collection: &str,
        data: Record,
    ) -> Result<Record, PersistenceError> {
        self.create(collection, data)
    }

    async fn update_record(
        &self,
        collection: &str,
        id: i64,
        partial: Record,
    ) -> Result<Option<Record>, PersistenceError> {
        self.update(collection, id, partial)
    }

    async fn delete_record(
        &self,
        collection: &str,
        id: i64,
        min_items: usize,
    ) -> Result<bool, PersistenceError> {
        self.delete(collection, id, min_items)
    }
}
