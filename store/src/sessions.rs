//! Session sub-records stored inside `campaigns` records.
//!
//! A session's `id` is only unique within its own campaign's `sessions` list.

use serde_json::Value;

use crate::catalog::CollectionKind;
use crate::persistence::{next_id, PersistenceError, Record};
use crate::repository::EntityRepository;

const CAMPAIGNS: CollectionKind = CollectionKind::Campaigns;

/// Sessions of a campaign, or `None` when the campaign does not exist.
///
/// Non-object entries in the stored list are skipped.
pub fn list_sessions(repo: &EntityRepository, campaign_id: i64) -> Option<Vec<Record>> {
    let campaign = repo.read_one(CAMPAIGNS.name(), campaign_id)?;
    let sessions = match campaign.get("sessions") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        _ => vec![],
    };
    Some(sessions)
}

/// Append `session` to a campaign under the next per-campaign session id.
///
/// Returns the updated campaign record.
pub fn add_session(
    repo: &EntityRepository,
    campaign_id: i64,
    mut session: Record,
) -> Result<Record, PersistenceError> {
    let updated = repo.modify(CAMPAIGNS.name(), campaign_id, |campaign| {
        let mut sessions: Vec<Record> = match campaign.get("sessions") {
            None | Some(Value::Null) => vec![],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_object().cloned().ok_or_else(|| {
                        PersistenceError::InvalidRecord(format!(
                            "campaign {} has a non-object entry in 'sessions'",
                            campaign_id
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(PersistenceError::InvalidRecord(format!(
                    "campaign {} has a non-list 'sessions' field",
                    campaign_id
                )))
            }
        };

        let session_id = next_id(&format!("campaigns/{campaign_id}/sessions"), &sessions)?;
        session.insert("id".to_string(), Value::from(session_id));
        sessions.push(session);
        campaign.insert(
            "sessions".to_string(),
            Value::Array(sessions.into_iter().map(Value::Object).collect()),
        );
        tracing::debug!("Added session {} to campaign {}", session_id, campaign_id);
        Ok(())
    })?;

    updated.ok_or_else(|| PersistenceError::NotFound {
        collection: CAMPAIGNS.name().to_string(),
        id: campaign_id,
    })
}
