//! Populate a fresh data directory with starter collections.
//!
//! Only collections that have never been written are touched. Each one is
//! copied from `<defaults_dir>/<name>.json` when that file exists and holds a
//! JSON array of objects. Collections with a delete floor and no defaults file
//! get a small built-in set so the floor can be honoured from the start.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::CollectionKind;
use crate::persistence::{PersistenceError, Record};
use crate::repository::EntityRepository;

/// What [`seed_defaults`] did for each collection.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Collections copied from the defaults directory.
    pub copied: Vec<CollectionKind>,
    /// Collections written from the built-in fallback set.
    pub fallback: Vec<CollectionKind>,
    /// Collections left alone because they already exist.
    pub skipped: Vec<CollectionKind>,
}

pub fn seed_defaults(repo: &EntityRepository, defaults_dir: Option<&Path>) -> SeedReport {
    let mut report = SeedReport::default();

    for kind in CollectionKind::ALL {
        if repo.store().exists(kind.name()) {
            report.skipped.push(kind);
            continue;
        }

        let copied = defaults_dir
            .map(|dir| dir.join(format!("{}.json", kind.name())))
            .filter(|source| source.exists())
            .and_then(|source| match load_defaults(&source) {
                Ok(records) => Some((records, source)),
                Err(e) => {
                    tracing::warn!("Failed to load defaults from {:?}: {}", source, e);
                    None
                }
            });

        let (records, from_file) = match copied {
            Some((records, source)) => {
                tracing::info!("Seeding {} {} from {:?}", records.len(), kind, source);
                (records, true)
            }
            None if kind.min_items() > 0 => (fallback_records(kind), false),
            None => continue,
        };

        match repo.create_collection(kind.name(), &records) {
            Ok(true) if from_file => report.copied.push(kind),
            Ok(true) => {
                tracing::info!("Created fallback {}", kind);
                report.fallback.push(kind);
            }
            Ok(false) => report.skipped.push(kind),
            Err(e) => tracing::warn!("Failed to seed {}: {}", kind, e),
        }
    }

    report
}

fn load_defaults(source: &Path) -> Result<Vec<Record>, PersistenceError> {
    let contents = std::fs::read_to_string(source)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Minimal hardcoded records for collections that must never be empty.
fn fallback_records(kind: CollectionKind) -> Vec<Record> {
    let value = match kind {
        CollectionKind::Factions => json!([{
            "id": 1,
            "name": "Order of Shadows",
            "description": "A secret order of knights sworn against the dark",
            "lore": null,
            "color": "#8B0000",
            "image_url": null,
            "icon_url": null
        }]),
        CollectionKind::Bosses => json!([{
            "id": 1,
            "name": "The Ashen Drake",
            "description": "An ancient dragon that sleeps beneath the ruins",
            "level": 50,
            "health": 5000,
            "attack": 150,
            "defense": 100,
            "lore": null,
            "image_url": null,
            "icon_url": null
        }]),
        CollectionKind::Items => json!([{
            "id": 1,
            "name": "Healing Draught",
            "type": "consumable",
            "description": "Restores a measure of health",
            "effect": null,
            "value": 50,
            "rarity": "common",
            "lore": null,
            "image_url": null,
            "icon_url": null
        }]),
        _ => json!([]),
    };

    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => vec![],
    }
}
