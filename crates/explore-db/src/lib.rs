pub mod context;
pub mod cursor;
pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use context::{Context, Done};
pub use cursor::{Cursor, PAGE_SIZE, Page};
pub use error::StoreError;
pub use models::DecisionRow;
pub use store::DecisionStore;

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use rusqlite::{Connection, OpenFlags};
use tracing::info;

const STATEMENT_CACHE_CAPACITY: usize = 32;

/// Connection settings for [`Database::open`].
#[derive(Debug, Clone)]
pub struct DbOptions {
    /// Read-only connections used for counts, lookups and listings.
    pub reader_pool_size: usize,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            reader_pool_size: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Decision database with reader/writer split.
///
/// All writes go through the single writer connection; SQLite serializes
/// them at the primary-key upsert. Readers see every committed write.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path, opts: &DbOptions) -> Result<Self> {
        let writer = Connection::open(path)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;
        writer.busy_timeout(opts.busy_timeout)?;
        writer.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);

        migrations::run(&writer)?;

        let pool_size = opts.reader_pool_size.max(1);
        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(opts.busy_timeout)?;
            conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            pool_size
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| StoreError::Pool(format!("reader lock poisoned: {e}")))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::Pool(format!("writer lock poisoned: {e}")))?;
        f(&conn)
    }

    /// Release every cached prepared statement. Connections close on drop.
    pub fn close(&self) {
        let conns = std::iter::once(&self.writer).chain(self.readers.iter());
        for conn in conns {
            if let Ok(conn) = conn.lock() {
                conn.flush_prepared_statement_cache();
            }
        }
        info!("Database closed");
    }
}
