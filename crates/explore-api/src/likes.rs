use axum::{Json, extract::State};

use explore_types::api::{
    CountLikedYouRequest, CountLikedYouResponse, ListLikedYouRequest, ListLikedYouResponse,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validate;

pub async fn count_liked_you(
    State(state): State<AppState>,
    Json(req): Json<CountLikedYouRequest>,
) -> Result<Json<CountLikedYouResponse>, ApiError> {
    validate::recipient(&req.recipient_id)?;

    let ctx = state.request_context();
    let resp = state.service.count_liked_you(&ctx, &req.recipient_id).await?;
    Ok(Json(resp))
}

pub async fn list_liked_you(
    State(state): State<AppState>,
    Json(req): Json<ListLikedYouRequest>,
) -> Result<Json<ListLikedYouResponse>, ApiError> {
    validate::recipient(&req.recipient_id)?;

    let ctx = state.request_context();
    let resp = state
        .service
        .list_liked_you(&ctx, &req.recipient_id, req.pagination_token.as_deref())
        .await?;
    Ok(Json(resp))
}

/// Likers the recipient has not liked back.
pub async fn list_new_liked_you(
    State(state): State<AppState>,
    Json(req): Json<ListLikedYouRequest>,
) -> Result<Json<ListLikedYouResponse>, ApiError> {
    validate::recipient(&req.recipient_id)?;

    let ctx = state.request_context();
    let resp = state
        .service
        .list_new_liked_you(&ctx, &req.recipient_id, req.pagination_token.as_deref())
        .await?;
    Ok(Json(resp))
}
