//! Authentication middleware and extractors.
//!
//! [`TokenExtractor`] runs on every request and stashes a well-formed bearer
//! token in the request extensions. Protected handlers then take an
//! [`AuthenticatedUser`], which verifies that token and loads the user.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
    web,
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};

use bloglist_core::domain::User;
use bloglist_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Raw bearer token taken from the `Authorization` header. Not yet verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// Parse `Authorization: Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<BearerToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(BearerToken(token.to_string()))
    } else {
        None
    }
}

/// Middleware that attaches the bearer token, if any, to the request.
/// A missing or malformed header is not an error at this stage.
pub struct TokenExtractor;

impl<S, B> Transform<S, ServiceRequest> for TokenExtractor
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = TokenExtractorService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenExtractorService { service }))
    }
}

pub struct TokenExtractorService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TokenExtractorService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = bearer_token(req.headers()) {
            req.extensions_mut().insert(token);
        }

        self.service.call(req)
    }
}

/// The user behind a verified bearer token.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(AuthenticatedUser(user): AuthenticatedUser) -> impl Responder {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req.extensions().get::<BearerToken>().cloned();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::Internal("AppState not found in app data".to_string())
            })?;
            let BearerToken(token) = token.ok_or(AuthError::MissingAuth)?;

            let claims = state.tokens.validate_token(&token)?;

            // A valid signature is not enough: the user may have been removed since.
            let user = state
                .users
                .find_by_id(claims.user_id)
                .await?
                .ok_or_else(|| AppError::Unauthorized("token invalid".to_string()))?;

            tracing::debug!(user_id = %user.id, username = %user.username, "Authenticated request");
            Ok(AuthenticatedUser(user))
        })
    }
}
