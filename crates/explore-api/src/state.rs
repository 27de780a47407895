use std::sync::Arc;
use std::time::Duration;

use explore_db::Context;

use crate::service::MatchService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub service: MatchService,
    /// Budget for a single RPC, store round trips included.
    pub request_timeout: Duration,
}

impl AppStateInner {
    pub fn new(service: MatchService, request_timeout: Duration) -> AppState {
        Arc::new(Self {
            service,
            request_timeout,
        })
    }

    /// Fresh context for one request. Dropping the handler future (client
    /// hung up) abandons the store call along with it.
    pub fn request_context(&self) -> Context {
        Context::background().with_timeout(self.request_timeout)
    }
}
