//! Authentication handlers.

use actix_web::HttpResponse;

use crate::middleware::auth::Identity;

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(identity.principal)
}
