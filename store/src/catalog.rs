//! The fixed set of entity kinds the compendium stores.
//!
//! Each kind maps to one collection name and carries the minimum number of
//! records that must survive a delete.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Abilities,
    Armors,
    Bosses,
    Campaigns,
    Characters,
    DndClasses,
    Factions,
    Items,
    Knights,
    Lores,
    Maps,
    Parties,
    Races,
    Spells,
    Weapons,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 15] = [
        CollectionKind::Abilities,
        CollectionKind::Armors,
        CollectionKind::Bosses,
        CollectionKind::Campaigns,
        CollectionKind::Characters,
        CollectionKind::DndClasses,
        CollectionKind::Factions,
        CollectionKind::Items,
        CollectionKind::Knights,
        CollectionKind::Lores,
        CollectionKind::Maps,
        CollectionKind::Parties,
        CollectionKind::Races,
        CollectionKind::Spells,
        CollectionKind::Weapons,
    ];

    /// Collection name, also the file stem on disk.
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Abilities => "abilities",
            CollectionKind::Armors => "armors",
            CollectionKind::Bosses => "bosses",
            CollectionKind::Campaigns => "campaigns",
            CollectionKind::Characters => "characters",
            CollectionKind::DndClasses => "dnd_classes",
            CollectionKind::Factions => "factions",
            CollectionKind::Items => "items",
            CollectionKind::Knights => "knights",
            CollectionKind::Lores => "lores",
            CollectionKind::Maps => "maps",
            CollectionKind::Parties => "parties",
            CollectionKind::Races => "races",
            CollectionKind::Spells => "spells",
            CollectionKind::Weapons => "weapons",
        }
    }

    /// Delete floor: the collection may never shrink below this many records.
    pub fn min_items(self) -> usize {
        match self {
            CollectionKind::Bosses | CollectionKind::Factions | CollectionKind::Items => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown collection kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for CollectionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
