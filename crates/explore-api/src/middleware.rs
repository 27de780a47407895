use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};

/// One log line per RPC: path, status and latency.
pub async fn log_rpc(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();
    if status.is_server_error() {
        warn!("[rpc] {} - {} - {:?}", path, status, elapsed);
    } else {
        info!("[rpc] {} - {} - {:?}", path, status, elapsed);
    }

    response
}
