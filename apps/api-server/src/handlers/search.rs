//! Search handler.

use actix_web::{HttpResponse, web};

use quill_core::service::DEFAULT_SEARCH_LIMIT;
use quill_shared::dto::SearchParams;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/search?q=&limit=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let text = query.q.as_deref().unwrap_or_default();
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let result = state.search.search(text, limit).await?;
    Ok(HttpResponse::Ok().json(result))
}
