//! Async decision store.
//!
//! SQLite calls are blocking, so every operation runs on the blocking pool
//! and races its [`Context`]. Once the context fires the caller gets
//! `Cancelled`/`DeadlineExceeded` straight away; a statement already handed
//! to SQLite still runs to completion in the background and its result is
//! dropped, so a cancelled write may or may not have been applied.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::context::Context;
use crate::cursor::{Cursor, PAGE_SIZE, Page};
use crate::error::StoreError;
use crate::models::DecisionRow;
use crate::{Database, DbOptions};

#[derive(Clone)]
pub struct DecisionStore {
    db: Arc<Database>,
}

impl DecisionStore {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn open(path: &Path, opts: &DbOptions) -> anyhow::Result<Self> {
        Ok(Self::new(Database::open(path, opts)?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn close(&self) {
        self.db.close();
    }

    pub async fn put_decision(
        &self,
        ctx: &Context,
        actor_id: &str,
        recipient_id: &str,
        liked: bool,
    ) -> Result<(), StoreError> {
        let (actor, recipient) = (actor_id.to_owned(), recipient_id.to_owned());
        self.run(ctx, "put decision", move |db| {
            db.put_decision(&actor, &recipient, liked)
        })
        .await?;
        debug!(actor_id, recipient_id, liked, "decision stored");
        Ok(())
    }

    pub async fn get_decision(
        &self,
        ctx: &Context,
        actor_id: &str,
        recipient_id: &str,
    ) -> Result<Option<DecisionRow>, StoreError> {
        let (actor, recipient) = (actor_id.to_owned(), recipient_id.to_owned());
        self.run(ctx, "get decision", move |db| db.get_decision(&actor, &recipient))
            .await
    }

    /// True iff both directions currently hold a like.
    ///
    /// The two lookups are separate statements with no shared transaction; a
    /// concurrent write to either direction may land between them.
    pub async fn is_mutual(&self, ctx: &Context, a: &str, b: &str) -> Result<bool, StoreError> {
        let (a, b) = (a.to_owned(), b.to_owned());
        self.run(ctx, "check mutual", move |db| db.is_mutual(&a, &b))
            .await
    }

    pub async fn count_liked_you(
        &self,
        ctx: &Context,
        recipient_id: &str,
    ) -> Result<u64, StoreError> {
        let recipient = recipient_id.to_owned();
        self.run(ctx, "count liked you", move |db| db.count_liked_you(&recipient))
            .await
    }

    pub async fn list_liked_you(
        &self,
        ctx: &Context,
        recipient_id: &str,
        cursor: Option<Cursor>,
    ) -> Result<Page<DecisionRow>, StoreError> {
        let recipient = recipient_id.to_owned();
        self.run(ctx, "list liked you", move |db| {
            db.list_liked_you(&recipient, cursor.as_ref(), PAGE_SIZE)
        })
        .await
    }

    pub async fn list_new_liked_you(
        &self,
        ctx: &Context,
        recipient_id: &str,
        cursor: Option<Cursor>,
    ) -> Result<Page<DecisionRow>, StoreError> {
        let recipient = recipient_id.to_owned();
        self.run(ctx, "list new liked you", move |db| {
            db.list_new_liked_you(&recipient, cursor.as_ref(), PAGE_SIZE)
        })
        .await
    }

    async fn run<T, F>(&self, ctx: &Context, op: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        ctx.check(op)?;

        let db = Arc::clone(&self.db);
        let task = tokio::task::spawn_blocking(move || f(&db));

        tokio::select! {
            biased;
            done = ctx.done() => Err(done.into_error(op)),
            joined = task => joined.map_err(|source| StoreError::Task { op, source })?,
        }
    }
}
