//! # Bloglist API Server
//!
//! HTTP layer of the bloglist backend: configuration, middleware, handlers,
//! and [`build_app`], which assembles them into one Actix-web application.

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use middleware::TokenExtractor;
use middleware::error::json_error_handler;
use observability::RequestLogger;
use state::AppState;

/// Assemble the application.
///
/// Middleware runs outermost first: tracing span, request logger, token
/// extractor. Requests no route matches fall through to the unknown-endpoint
/// handler.
pub fn build_app(
    state: AppState,
    testing_routes: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(TokenExtractor)
        .wrap(RequestLogger)
        .wrap(TracingLogger::default())
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .configure(|cfg| handlers::configure_routes(cfg, testing_routes))
        .default_service(web::to(handlers::unknown_endpoint))
}
