//! Database row types. These map directly to SQLite rows.
//! Distinct from explore-types API payloads to keep the DB layer independent.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::StoreError;

/// One stored like/pass decision for an ordered (actor, recipient) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRow {
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fixed-width nanosecond RFC 3339 (`2026-01-02T03:04:05.000000006Z`).
///
/// Every stored timestamp has the same width, so SQLite's text ordering
/// matches chronological ordering.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored timestamp. Also accepts SQLite's `datetime('now')` shape for
/// rows written by hand.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Columns as read from a `SELECT actor_id, recipient_id, liked, created_at, updated_at`.
pub(crate) struct RawDecision {
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl RawDecision {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            actor_id: row.get(0)?,
            recipient_id: row.get(1)?,
            liked: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    pub(crate) fn into_row(self) -> Result<DecisionRow, StoreError> {
        let created_at = self.timestamp("created_at", &self.created_at)?;
        let updated_at = self.timestamp("updated_at", &self.updated_at)?;
        Ok(DecisionRow {
            actor_id: self.actor_id,
            recipient_id: self.recipient_id,
            liked: self.liked,
            created_at,
            updated_at,
        })
    }

    fn timestamp(&self, column: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
        parse_timestamp(value).ok_or_else(|| StoreError::CorruptRow {
            column,
            value: value.to_string(),
            detail: format!("actor={} recipient={}", self.actor_id, self.recipient_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let fractional = whole + chrono::Duration::nanoseconds(6);
        let a = format_timestamp(whole);
        let b = format_timestamp(fractional);
        assert_eq!(a, "2026-01-02T03:04:05.000000000Z");
        assert_eq!(b, "2026-01-02T03:04:05.000000006Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn parse_round_trips_nanoseconds() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        assert_eq!(parse_timestamp(&format_timestamp(ts)), Some(ts));
    }

    #[test]
    fn parse_accepts_sqlite_default_format() {
        let parsed = parse_timestamp("2024-03-01 10:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
