use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("running migration v1 (decisions)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE decisions (
                actor_id        TEXT NOT NULL,
                recipient_id    TEXT NOT NULL,
                liked           INTEGER NOT NULL CHECK (liked IN (0, 1)),
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL,
                PRIMARY KEY (actor_id, recipient_id)
            );

            CREATE INDEX idx_decisions_recipient ON decisions(recipient_id);
            CREATE INDEX idx_decisions_actor ON decisions(actor_id);
            CREATE INDEX idx_decisions_created_at ON decisions(created_at DESC);

            -- Serves both liker listings: equality on recipient and liked,
            -- then walks created_at newest first.
            CREATE INDEX idx_decisions_likers
                ON decisions(recipient_id, liked, created_at DESC, actor_id DESC);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn pair_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        let insert = "INSERT INTO decisions (actor_id, recipient_id, liked, created_at, updated_at)
                      VALUES ('1', '2', 1, 't', 't')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}
