mod collection_store;
pub mod traits;

pub use collection_store::{validate_collection_name, CollectionStore};

use serde_json::{Map, Value};

/// One stored entity: a JSON object carrying an integer `id` field.
pub type Record = Map<String, Value>;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No record with id {id} in collection '{collection}'")]
    NotFound { collection: String, id: i64 },
    #[error("Cannot delete from '{collection}': at least {min_items} record(s) must remain")]
    FloorViolation { collection: String, min_items: usize },
    #[error("Invalid collection name: {0:?}")]
    InvalidCollectionName(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("No ids left in '{collection}': the largest id is already {max}")]
    IdExhausted { collection: String, max: i64 },
}

/// Integer `id` of a record, if it has one.
///
/// Integral floats such as `3.0` count as the integer they spell; anything
/// outside the `i64` range does not.
pub fn record_id(record: &Record) -> Option<i64> {
    let id = record.get("id")?;
    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Next identifier for a list of records: one past the largest existing id.
///
/// Records without an integer id count as 0. `collection` only labels the
/// error returned when the largest id is `i64::MAX`.
pub fn next_id(collection: &str, records: &[Record]) -> Result<i64, PersistenceError> {
    let max = records
        .iter()
        .map(|r| record_id(r).unwrap_or(0))
        .max()
        .unwrap_or(0);
    max.checked_add(1).ok_or_else(|| PersistenceError::IdExhausted {
        collection: collection.to_string(),
        max,
    })
}

/// Convert a JSON value into a record, rejecting anything that is not an object.
pub fn into_record(value: Value) -> Result<Record, PersistenceError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PersistenceError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
