//! Login handler.

use actix_web::{HttpResponse, web};

use bloglist_core::ports::AuthError;
use bloglist_shared::dto::{LoginRequest, LoginResponse};

use crate::middleware::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/login
///
/// Unknown usernames and wrong passwords produce the same response.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let Some(user) = state.users.find_by_username(&req.username).await? else {
        tracing::info!(username = %req.username, "Login failed");
        return Err(AuthError::InvalidCredentials.into());
    };

    // Verify password
    let passwords = state.passwords.clone();
    let password = req.password;
    let hash = user.password_hash.clone();
    let valid = web::block(move || passwords.verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if !valid {
        tracing::info!(username = %user.username, "Login failed");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "Login succeeded");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
