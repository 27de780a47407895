//! Keyset pagination over `created_at DESC, actor_id DESC`.
//!
//! A page is fetched with one extra row; if the extra row shows up, the page
//! is truncated and the last kept row becomes the boundary for the next
//! request. Rows at or before the boundary in that order are excluded, so
//! consecutive pages never repeat or skip a row. `created_at` never changes
//! after insert, which keeps the boundary stable while decisions are updated.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{DecisionRow, format_timestamp, parse_timestamp};

/// Rows per page for both liker listings.
pub const PAGE_SIZE: usize = 30;

const SEPARATOR: char = '|';

/// Boundary of the last delivered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    created_at: DateTime<Utc>,
    actor_id: Option<String>,
}

/// One page of results plus the cursor for the next one, `None` at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<Cursor>,
}

impl Cursor {
    /// Timestamp-only boundary: excludes every row with `created_at >= ts`.
    pub fn at(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            actor_id: None,
        }
    }

    /// Boundary just past `row`, breaking timestamp ties on `actor_id`.
    pub fn after(row: &DecisionRow) -> Self {
        Self {
            created_at: row.created_at,
            actor_id: Some(row.actor_id.clone()),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    /// Opaque URL-safe token.
    pub fn encode(&self) -> String {
        let mut raw = format_timestamp(self.created_at);
        if let Some(actor) = &self.actor_id {
            raw.push(SEPARATOR);
            raw.push_str(actor);
        }
        B64.encode(raw)
    }

    pub fn decode(token: &str) -> Result<Self, StoreError> {
        let bytes = B64
            .decode(token)
            .map_err(|e| StoreError::InvalidCursor(format!("not base64: {e}")))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| StoreError::InvalidCursor("not utf-8".into()))?;

        let (ts, actor_id) = match raw.split_once(SEPARATOR) {
            Some((ts, actor)) => (ts, Some(actor.to_string())),
            None => (raw.as_str(), None),
        };
        let created_at = parse_timestamp(ts)
            .ok_or_else(|| StoreError::InvalidCursor(format!("bad timestamp '{ts}'")))?;

        Ok(Self {
            created_at,
            actor_id,
        })
    }

    /// SQL bound for `created_at`, in the stored text form.
    pub(crate) fn created_at_param(&self) -> String {
        format_timestamp(self.created_at)
    }
}

/// Trim a `page_size + 1` fetch down to one page.
pub(crate) fn into_page(mut rows: Vec<DecisionRow>, page_size: usize) -> Page<DecisionRow> {
    if rows.len() <= page_size {
        return Page {
            items: rows,
            next: None,
        };
    }
    rows.truncate(page_size);
    let next = rows.last().map(Cursor::after);
    Page { items: rows, next }
}
