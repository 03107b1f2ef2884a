//! HTTP handlers and route configuration.

mod blogs;
mod health;
mod login;
mod testing;
mod users;

use actix_web::{HttpRequest, HttpResponse, web};
use bloglist_shared::ErrorResponse;
use uuid::Uuid;

use crate::middleware::{AppError, AppResult};

/// Configure all application routes.
///
/// `testing_routes` mounts the fixture reset endpoint; keep it off in production.
pub fn configure_routes(cfg: &mut web::ServiceConfig, testing_routes: bool) {
    let mut api = web::scope("/api")
        // Public routes
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/blogs")
                .service(
                    web::resource("")
                        .route(web::get().to(blogs::list))
                        .route(web::post().to(blogs::create)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(blogs::get))
                        .route(web::put().to(blogs::update))
                        .route(web::delete().to(blogs::delete)),
                ),
        )
        .service(
            web::resource("/users")
                .route(web::get().to(users::list))
                .route(web::post().to(users::create)),
        )
        .route("/login", web::post().to(login::login));

    if testing_routes {
        api = api.route("/testing/reset", web::post().to(testing::reset));
    }

    cfg.service(api);
}

/// Fallback for requests no route matched.
pub async fn unknown_endpoint(req: HttpRequest) -> HttpResponse {
    tracing::debug!(path = %req.path(), "Unknown endpoint");

    HttpResponse::NotFound()
        .json(ErrorResponse::not_found("unknown endpoint").with_instance(req.path()))
}

/// Parse a path identifier; anything that is not a UUID is a client error.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId)
}
