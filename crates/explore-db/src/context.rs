//! Per-call cancellation and deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;

/// Why a [`Context`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Done {
    Cancelled,
    DeadlineExceeded,
}

/// Cancellation signal handed to every store operation.
///
/// Cloning shares the underlying token; [`Context::with_timeout`] derives a
/// child that is cancelled with its parent and may carry a tighter deadline.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that never expires on its own.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Non-blocking check, `None` while the context is still live.
    pub fn err(&self) -> Option<Done> {
        if self.token.is_cancelled() {
            return Some(Done::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Done::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Done {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => Done::Cancelled,
                _ = tokio::time::sleep_until(deadline) => Done::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                Done::Cancelled
            }
        }
    }

    pub(crate) fn check(&self, op: &'static str) -> Result<(), StoreError> {
        match self.err() {
            Some(done) => Err(done.into_error(op)),
            None => Ok(()),
        }
    }
}

impl Done {
    pub(crate) fn into_error(self, op: &'static str) -> StoreError {
        match self {
            Self::Cancelled => StoreError::Cancelled { op },
            Self::DeadlineExceeded => StoreError::DeadlineExceeded { op },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_live() {
        assert_eq!(Context::background().err(), None);
    }

    #[test]
    fn cancelling_parent_cancels_child() {
        let parent = Context::background();
        let child = parent.with_timeout(Duration::from_secs(60));
        parent.cancel();
        assert_eq!(child.err(), Some(Done::Cancelled));
    }

    #[test]
    fn child_keeps_tighter_parent_deadline() {
        let parent = Context::background().with_timeout(Duration::from_millis(10));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn done_reports_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(50));
        assert_eq!(ctx.done().await, Done::DeadlineExceeded);
        assert!(matches!(
            ctx.check("count liked you"),
            Err(StoreError::DeadlineExceeded { op: "count liked you" })
        ));
    }

    #[tokio::test]
    async fn done_reports_cancel() {
        let ctx = Context::background();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.done().await });
        ctx.cancel();
        assert_eq!(handle.await.unwrap(), Done::Cancelled);
    }
}
