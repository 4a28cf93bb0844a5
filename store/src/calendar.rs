//! Calendar view over campaign sessions.
//!
//! Sessions live nested inside `campaigns` records. The calendar flattens them
//! into buckets keyed by each session's raw `date` text, tagging every entry
//! with the campaign it came from. Filtering by year/month uses the parsed
//! date, while the bucket key stays the original text, so two spellings of the
//! same day land in separate buckets.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_json::Value;

use crate::catalog::CollectionKind;
use crate::persistence::Record;
use crate::repository::EntityRepository;

/// Sessions grouped by their raw date string.
///
/// Key order carries no meaning for callers; sort explicitly if a chronological
/// listing is needed.
pub type Calendar = BTreeMap<String, Vec<Record>>;

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];
const OFFSET_FORMATS: [&str; 4] = ["", "Z", "%:z", "%z"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl CalendarFilter {
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self { year, month }
    }

    fn matches(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| date.month() == m)
    }
}

/// Parse an ISO-8601 date or date-time, keeping only the calendar date.
///
/// The time part may be `HH`, `HH:MM` or `HH:MM:SS[.fff]`, separated by `T` or
/// a space, with an optional `Z` or `+HH:MM` offset. Offsets are honoured as
/// written: `2024-05-01T23:30:00-02:00` is May 1st.
pub fn parse_session_date(raw: &str) -> Option<NaiveDate> {
    let (date, rest) = NaiveDate::parse_and_remainder(raw, "%Y-%m-%d").ok()?;
    if rest.is_empty() {
        return Some(date);
    }
    let time = rest.strip_prefix(['T', ' '])?;
    is_iso_time(time).then_some(date)
}

fn is_iso_time(text: &str) -> bool {
    let text = with_minutes(text);
    TIME_FORMATS
        .iter()
        .flat_map(|time| OFFSET_FORMATS.iter().map(move |offset| format!("{time}{offset}")))
        .any(|fmt| NaiveTime::parse_from_str(&text, &fmt).is_ok())
}

/// `19` becomes `19:00` and `19+02:00` becomes `19:00+02:00`.
fn with_minutes(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let hour_only = bytes.len() >= 2
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes.get(2).map_or(true, |&b| matches!(b, b'Z' | b'+' | b'-'));
    if hour_only {
        Cow::Owned(format!("{}:00{}", &text[..2], &text[2..]))
    } else {
        Cow::Borrowed(text)
    }
}

/// Bucket every session of `campaigns` that passes `filter`.
pub fn aggregate_sessions(campaigns: &[Record], filter: CalendarFilter) -> Calendar {
    let mut calendar = Calendar::new();

    for campaign in campaigns {
        let Some(Value::Array(sessions)) = campaign.get("sessions") else {
            continue;
        };
        for session in sessions {
            let Value::Object(session) = session else {
                continue;
            };
            let Some(raw_date) = session.get("date").and_then(Value::as_str) else {
                continue;
            };
            let Some(date) = parse_session_date(raw_date) else {
                tracing::debug!("Skipping session with unparseable date {:?}", raw_date);
                continue;
            };
            if !filter.matches(date) {
                continue;
            }

            let mut entry = session.clone();
            entry.insert(
                "campaign_id".to_string(),
                campaign.get("id").cloned().unwrap_or(Value::Null),
            );
            entry.insert(
                "campaign_name".to_string(),
                campaign
                    .get("name")
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new())),
            );
            calendar.entry(raw_date.to_string()).or_default().push(entry);
        }
    }

    calendar
}

/// Build the calendar from the stored `campaigns` collection.
pub fn build_calendar(repo: &EntityRepository, year: Option<i32>, month: Option<u32>) -> Calendar {
    let campaigns = repo.read_all(CollectionKind::Campaigns.name());
    aggregate_sessions(&campaigns, CalendarFilter::new(year, month))
}
