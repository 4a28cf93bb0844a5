//! Flat JSON record storage for the compendium.
//!
//! Each entity kind (characters, weapons, campaigns, ...) is one collection,
//! stored as a JSON array in `<data_dir>/<name>.json`. [`EntityRepository`]
//! layers id assignment, merge updates and floor-guarded deletes over
//! [`CollectionStore`]; [`calendar`] and [`sessions`] work on the nested
//! session lists of the `campaigns` collection.

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod persistence;
pub mod repository;
pub mod seed;
pub mod sessions;

pub use calendar::{build_calendar, Calendar, CalendarFilter};
pub use catalog::{CollectionKind, UnknownKind};
pub use persistence::traits::RecordRepository;
pub use persistence::{into_record, record_id, CollectionStore, PersistenceError, Record};
pub use repository::EntityRepository;
pub use seed::{seed_defaults, SeedReport};
