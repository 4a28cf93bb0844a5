//! Subcommand handlers. Each one maps onto a single repository operation and
//! returns the JSON document to print.

use compendium_store::{
    build_calendar, into_record, seed_defaults, sessions, CollectionKind, EntityRepository,
    PersistenceError, Record, RecordRepository,
};
use serde_json::{json, Value};
use std::path::Path;

/// Error type for CLI operations.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The payload argument was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The requested record does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: CollectionKind, id: i64 },

    /// Any other persistence failure, including floor violations.
    #[error(transparent)]
    Store(#[from] PersistenceError),
}

fn parse_record(payload: &str) -> Result<Record, CliError> {
    let value: Value = serde_json::from_str(payload)?;
    Ok(into_record(value)?)
}

pub async fn list(repo: &EntityRepository, kind: CollectionKind) -> Result<Value, CliError> {
    let records = repo.list_records(kind.name()).await;
    Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
}

pub async fn get(
    repo: &EntityRepository,
    kind: CollectionKind,
    id: i64,
) -> Result<Value, CliError> {
    repo.get_record(kind.name(), id)
        .await
        .map(Value::Object)
        .ok_or(CliError::NotFound { kind, id })
}

pub async fn create(
    repo: &EntityRepository,
    kind: CollectionKind,
    payload: &str,
) -> Result<Value, CliError> {
    let data = parse_record(payload)?;
    let created = repo.create_record(kind.name(), data).await?;
    tracing::info!("Created {} {}", kind, created["id"]);
    Ok(Value::Object(created))
}

pub async fn update(
    repo: &EntityRepository,
    kind: CollectionKind,
    id: i64,
    payload: &str,
) -> Result<Value, CliError> {
    let partial = parse_record(payload)?;
    repo.update_record(kind.name(), id, partial)
        .await?
        .map(Value::Object)
        .ok_or(CliError::NotFound { kind, id })
}

pub async fn delete(
    repo: &EntityRepository,
    kind: CollectionKind,
    id: i64,
) -> Result<Value, CliError> {
    if !repo.delete_record(kind.name(), id, kind.min_items()).await? {
        return Err(CliError::NotFound { kind, id });
    }
    tracing::info!("Deleted {} {}", kind, id);
    Ok(json!({ "deleted": id }))
}

pub fn list_sessions(repo: &EntityRepository, campaign_id: i64) -> Result<Value, CliError> {
    sessions::list_sessions(repo, campaign_id)
        .map(|items| Value::Array(items.into_iter().map(Value::Object).collect()))
        .ok_or(CliError::NotFound {
            kind: CollectionKind::Campaigns,
            id: campaign_id,
        })
}

pub fn add_session(
    repo: &EntityRepository,
    campaign_id: i64,
    payload: &str,
) -> Result<Value, CliError> {
    let session = parse_record(payload)?;
    match sessions::add_session(repo, campaign_id, session) {
        Ok(campaign) => Ok(Value::Object(campaign)),
        Err(PersistenceError::NotFound { .. }) => Err(CliError::NotFound {
            kind: CollectionKind::Campaigns,
            id: campaign_id,
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn calendar(
    repo: &EntityRepository,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Value, CliError> {
    let calendar = build_calendar(repo, year, month);
    to_output(&calendar)
}

pub fn seed(repo: &EntityRepository, defaults_dir: &Path) -> Result<Value, CliError> {
    let report = seed_defaults(repo, Some(defaults_dir));
    to_output(&report)
}

/// Serialize a result for printing. Failures here are store-side, not a bad payload.
fn to_output<T: serde::Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::Store(PersistenceError::Json(e)))
}
