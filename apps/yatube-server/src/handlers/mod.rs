//! HTTP handlers and route configuration.

mod auth;
mod context;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::observability::RequestId;

/// Where anonymous clients are sent when a page needs a user.
pub const LOGIN_URL: &str = "/auth/login/";

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // `/posts/abc/` is a missing page, not a bad request.
    let path_config = web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(error = %err, path = req.path(), "Unmatched path parameter");
        AppError::NotFound(format!("No page at {}", req.path())).into()
    });
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(path_config)
        .app_data(json_config)
        // Feeds and detail
        .route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        // Forms
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit_post)),
        )
        // Auth routes
        .service(
            web::scope("/auth")
                .route("/signup/", web::post().to(auth::signup))
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_page))
                        .route(web::post().to(auth::login)),
                ),
        )
        .route("/health/", web::get().to(health::health_check))
        .default_service(web::to(not_found));
}

/// Fallback for every unrouted request.
pub async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("The requested page does not exist")
            .with_instance(req.path())
            .with_request_id(request_id.as_str()),
    )
}
