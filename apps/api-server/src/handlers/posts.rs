//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::service::DEFAULT_FEATURED_LIMIT;
use quill_core::validation::{ListPosts, NewPost, PostPatch};
use quill_shared::dto::{FeaturedParams, ListPostsParams, Pagination, PostCollection, PostListResponse};
use quill_shared::MessageResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let filter = ListPosts {
        page: params.page.unwrap_or(ListPosts::DEFAULT_PAGE),
        limit: params.limit.unwrap_or(ListPosts::DEFAULT_LIMIT),
        published: params.published_only().then_some(true),
        author_id: params.author_id,
    };

    let page = state.posts.list(filter).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: page.items,
        pagination: Pagination {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        },
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<NewPost>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .create(identity.principal(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// GET /api/posts/mine
pub async fn mine(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.dashboard(identity.principal()).await?;
    Ok(HttpResponse::Ok().json(PostCollection { posts }))
}

/// GET /api/posts/featured
pub async fn featured(
    state: web::Data<AppState>,
    query: web::Query<FeaturedParams>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
    let posts = state.posts.featured(limit).await?;
    Ok(HttpResponse::Ok().json(PostCollection { posts }))
}

/// GET /api/posts/slug/{slug}
pub async fn by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.read_by_slug(&path).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: web::Json<PostPatch>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .update(identity.principal(), path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.principal(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
