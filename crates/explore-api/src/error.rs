use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, warn};

use explore_db::StoreError;

/// Handler error, rendered as a status code plus `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::InvalidCursor(_)) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Cancelled { .. }) => StatusCode::REQUEST_TIMEOUT,
            Self::Store(StoreError::DeadlineExceeded { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::InvalidArgument(msg) => msg.clone(),
            Self::Store(StoreError::InvalidCursor(_)) => "invalid pagination token".to_string(),
            Self::Store(e) if e.is_cancellation() => {
                debug!("request abandoned: {}", e);
                e.to_string()
            }
            // Storage details stay in the log
            Self::Store(e) => {
                warn!("store failure: {} ({:?})", e, std::error::Error::source(e));
                "internal error".to_string()
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rstest::rstest;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{self, Layer, SubscriberExt};

    use super::*;

    #[rstest]
    #[case(ApiError::InvalidArgument("nope".into()), StatusCode::BAD_REQUEST)]
    #[case(StoreError::InvalidCursor("bad".into()).into(), StatusCode::BAD_REQUEST)]
    #[case(StoreError::Cancelled { op: "put decision" }.into(), StatusCode::REQUEST_TIMEOUT)]
    #[case(StoreError::DeadlineExceeded { op: "list liked you" }.into(), StatusCode::GATEWAY_TIMEOUT)]
    #[case(StoreError::Pool("poisoned".into()).into(), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_to_status(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }

    /// Records the level of every event it sees.
    struct Levels(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for Levels {
        fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    fn levels_logged(err: ApiError) -> Vec<Level> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Levels(seen.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let _ = err.into_response();
        });
        let levels = seen.lock().unwrap().clone();
        levels
    }

    #[test]
    fn storage_failure_logs_at_warn() {
        let levels = levels_logged(StoreError::Pool("writer lock poisoned".into()).into());
        assert_eq!(levels, vec![Level::WARN]);
    }

    #[test]
    fn client_errors_are_not_logged_as_failures() {
        let levels = levels_logged(ApiError::InvalidArgument("bad id".into()));
        assert!(levels.is_empty());
    }
}
