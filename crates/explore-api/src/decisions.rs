use axum::{Json, extract::State};

use explore_types::api::{PutDecisionRequest, PutDecisionResponse};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate;

pub async fn put_decision(
    State(state): State<AppState>,
    Json(req): Json<PutDecisionRequest>,
) -> Result<Json<PutDecisionResponse>, ApiError> {
    validate::decision(&req)?;

    let ctx = state.request_context();
    let resp = state
        .service
        .put_decision(&ctx, &req.actor_id, &req.recipient_id, req.liked)
        .await?;

    Ok(Json(resp))
}
