use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::cursor::{Cursor, Page, into_page};
use crate::error::{StorageContext, StoreError};
use crate::models::{DecisionRow, RawDecision, format_timestamp};

const COLUMNS: &str = "d.actor_id, d.recipient_id, d.liked, d.created_at, d.updated_at";

impl Database {
    // -- Writes --

    /// Insert or replace the decision for (actor, recipient).
    ///
    /// `created_at` is written only by the insert arm; a conflicting write
    /// overwrites `liked` and refreshes `updated_at`. The clock is read while
    /// the writer lock is held, so writes are stamped in the order SQLite
    /// applies them.
    pub fn put_decision(
        &self,
        actor_id: &str,
        recipient_id: &str,
        liked: bool,
    ) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| upsert_decision(conn, actor_id, recipient_id, liked, Utc::now()))
    }

    // -- Point reads --

    pub fn get_decision(
        &self,
        actor_id: &str,
        recipient_id: &str,
    ) -> Result<Option<DecisionRow>, StoreError> {
        let raw = self.with_conn(|conn| {
            conn.prepare_cached(&format!(
                "SELECT {COLUMNS} FROM decisions d WHERE d.actor_id = ?1 AND d.recipient_id = ?2"
            ))
            .and_then(|mut stmt| {
                stmt.query_row([actor_id, recipient_id], RawDecision::from_row)
                    .optional()
            })
            .storage("get decision", || pair(actor_id, recipient_id))
        })?;
        raw.map(RawDecision::into_row).transpose()
    }

    /// Whether actor's current decision about recipient is a like. No row reads as a pass.
    pub fn has_liked(&self, actor_id: &str, recipient_id: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| query_liked(conn, actor_id, recipient_id))
    }

    /// Two independent point lookups, one per direction.
    pub fn is_mutual(&self, a: &str, b: &str) -> Result<bool, StoreError> {
        let a_likes_b = self.has_liked(a, b)?;
        let b_likes_a = self.has_liked(b, a)?;
        Ok(a_likes_b && b_likes_a)
    }

    pub fn count_liked_you(&self, recipient_id: &str) -> Result<u64, StoreError> {
        let count: i64 = self.with_conn(|conn| {
            conn.prepare_cached(
                "SELECT COUNT(*) FROM decisions WHERE recipient_id = ?1 AND liked = 1",
            )
            .and_then(|mut stmt| stmt.query_row([recipient_id], |row| row.get(0)))
            .storage("count liked you", || format!("recipient={recipient_id}"))
        })?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    // -- Listings --

    /// Actors whose current decision about `recipient_id` is a like, newest first.
    pub fn list_liked_you(
        &self,
        recipient_id: &str,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<Page<DecisionRow>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM decisions d
             WHERE d.recipient_id = ?1 AND d.liked = 1"
        );
        self.list_page("list liked you", sql, recipient_id, cursor, page_size)
    }

    /// Like `list_liked_you`, minus actors the recipient currently likes back.
    ///
    /// The exclusion is evaluated inside the same statement, against the
    /// reciprocal row as it stands when the query runs.
    pub fn list_new_liked_you(
        &self,
        recipient_id: &str,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<Page<DecisionRow>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM decisions d
             WHERE d.recipient_id = ?1 AND d.liked = 1
               AND NOT EXISTS (
                   SELECT 1 FROM decisions r
                   WHERE r.actor_id = ?1
                     AND r.recipient_id = d.actor_id
                     AND r.liked = 1
               )"
        );
        self.list_page("list new liked you", sql, recipient_id, cursor, page_size)
    }

    fn list_page(
        &self,
        op: &'static str,
        mut sql: String,
        recipient_id: &str,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<Page<DecisionRow>, StoreError> {
        let limit = i64::try_from(page_size.saturating_add(1)).unwrap_or(i64::MAX);
        let boundary_ts = cursor.map(Cursor::created_at_param);
        let boundary_actor = cursor.and_then(Cursor::actor_id);

        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(4);
        params.push(&recipient_id);
        params.push(&limit);
        match (&boundary_ts, &boundary_actor) {
            (Some(ts), Some(actor)) => {
                sql.push_str(
                    " AND (d.created_at < ?3 OR (d.created_at = ?3 AND d.actor_id < ?4))",
                );
                params.push(ts);
                params.push(actor);
            }
            (Some(ts), None) => {
                sql.push_str(" AND d.created_at < ?3");
                params.push(ts);
            }
            _ => {}
        }
        sql.push_str(" ORDER BY d.created_at DESC, d.actor_id DESC LIMIT ?2");

        let raw = self.with_conn(|conn| {
            conn.prepare_cached(&sql)
                .and_then(|mut stmt| {
                    let rows = stmt
                        .query_map(params.as_slice(), RawDecision::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>();
                    rows
                })
                .storage(op, || format!("recipient={recipient_id}"))
        })?;

        let rows = raw
            .into_iter()
            .map(RawDecision::into_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(into_page(rows, page_size))
    }
}

/// `updated_at` never moves backwards, even if `now` is older than the
/// stored stamp.
fn upsert_decision(
    conn: &Connection,
    actor_id: &str,
    recipient_id: &str,
    liked: bool,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let ts = format_timestamp(now);
    conn.prepare_cached(
        "INSERT INTO decisions (actor_id, recipient_id, liked, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT (actor_id, recipient_id) DO UPDATE SET
             liked = excluded.liked,
             updated_at = MAX(decisions.updated_at, excluded.updated_at)",
    )
    .and_then(|mut stmt| stmt.execute(rusqlite::params![actor_id, recipient_id, liked, ts]))
    .storage("put decision", || pair(actor_id, recipient_id))?;
    Ok(())
}

fn query_liked(conn: &Connection, actor_id: &str, recipient_id: &str) -> Result<bool, StoreError> {
    let liked: Option<bool> = conn
        .prepare_cached("SELECT liked FROM decisions WHERE actor_id = ?1 AND recipient_id = ?2")
        .and_then(|mut stmt| {
            stmt.query_row([actor_id, recipient_id], |row| row.get(0))
                .optional()
        })
        .storage("check like", || pair(actor_id, recipient_id))?;
    Ok(liked.unwrap_or(false))
}

fn pair(actor_id: &str, recipient_id: &str) -> String {
    format!("actor={actor_id} recipient={recipient_id}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::DbOptions;

    fn open_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("explore.db"), &DbOptions::default()).unwrap();
        (dir, db)
    }

    #[test]
    fn late_write_with_older_clock_keeps_updated_at_monotonic() {
        let (_dir, db) = open_db();
        let newer = Utc.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(60_893_908);
        let older = newer - chrono::Duration::milliseconds(10);

        db.with_conn_mut(|conn| upsert_decision(conn, "1", "2", true, newer))
            .unwrap();
        db.with_conn_mut(|conn| upsert_decision(conn, "1", "2", false, older))
            .unwrap();

        let row = db.get_decision("1", "2").unwrap().unwrap();
        assert!(!row.liked);
        assert_eq!(row.created_at, newer);
        assert_eq!(row.updated_at, newer);
        assert!(row.updated_at >= row.created_at);
    }

    #[test]
    fn later_write_advances_updated_at() {
        let (_dir, db) = open_db();
        let first = Utc.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap();
        let second = first + chrono::Duration::milliseconds(3);

        db.with_conn_mut(|conn| upsert_decision(conn, "1", "2", true, first))
            .unwrap();
        db.with_conn_mut(|conn| upsert_decision(conn, "1", "2", true, second))
            .unwrap();

        let row = db.get_decision("1", "2").unwrap().unwrap();
        assert_eq!(row.created_at, first);
        assert_eq!(row.updated_at, second);
    }

    #[test]
    fn clock_is_read_per_write() {
        let (_dir, db) = open_db();

        db.put_decision("1", "2", true).unwrap();
        let before = db.get_decision("1", "2").unwrap().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        db.put_decision("1", "2", false).unwrap();
        let after = db.get_decision("1", "2").unwrap().unwrap();

        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }
}
