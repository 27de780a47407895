pub mod decisions;
pub mod error;
pub mod likes;
pub mod middleware;
pub mod service;
pub mod state;
pub mod validate;

use axum::{
    Router, middleware as axum_mw,
    routing::{get, post},
};

use crate::state::AppState;

/// RPC routes, named after the service methods they serve.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/explore.ExploreService/PutDecision", post(decisions::put_decision))
        .route("/explore.ExploreService/CountLikedYou", post(likes::count_liked_you))
        .route("/explore.ExploreService/ListLikedYou", post(likes::list_liked_you))
        .route("/explore.ExploreService/ListNewLikedYou", post(likes::list_new_liked_you))
        .layer(axum_mw::from_fn(middleware::log_rpc))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
