//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::validation::NewComment;
use quill_shared::dto::ListCommentsParams;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/comments?postId=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListCommentsParams>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list(query.post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<NewComment>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(identity.principal(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}
