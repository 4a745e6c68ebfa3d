//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod search;


use actix_web::web;

use crate::middleware::error::AppError;

/// Configure extractor error handling and all application routes.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    // Only `{id}` segments are typed, so a malformed one names no post.
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Post".to_string()).into()),
    );
    configure_routes(cfg);
}

/// Configure all application routes.
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/search", web::get().to(search::search))
            .service(web::scope("/auth").route("/me", web::get().to(auth::me)))
            // Literal segments before `{id}`
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/mine", web::get().to(posts::mine))
                    .route("/featured", web::get().to(posts::featured))
                    .route("/slug/{slug}", web::get().to(posts::by_slug))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::get().to(comments::list))
                    .route("", web::post().to(comments::create)),
            ),
    );
}
