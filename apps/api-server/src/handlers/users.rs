//! User registration and listing.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloglist_core::DomainError;
use bloglist_core::domain::{Blog, User};
use bloglist_shared::dto::{BlogSummary, RegisterUserRequest, UserResponse};

use crate::middleware::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/users
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    User::validate_registration(&req.username, &req.password)?;

    // Check if user already exists
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(DomainError::Duplicate("expected `username` to be unique".to_string()).into());
    }

    // Argon2 is deliberately slow; keep it off the async workers.
    let passwords = state.passwords.clone();
    let password = req.password;
    let password_hash = web::block(move || passwords.hash(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    // The unique index still guards against a concurrent registration.
    let user = User::new(req.username, req.name, password_hash);
    let saved = state.users.create(user).await?;

    tracing::info!(user_id = %saved.id, username = %saved.username, "User registered");

    Ok(HttpResponse::Created().json(UserResponse::new(&saved, Vec::new())))
}

/// GET /api/users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.find_all().await?;

    let blog_ids: Vec<Uuid> = users
        .iter()
        .flat_map(|u| u.blog_ids.iter().copied())
        .collect();

    let blogs: HashMap<Uuid, Blog> = state
        .blogs
        .find_by_ids(&blog_ids)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let body: Vec<UserResponse> = users
        .iter()
        .map(|user| {
            // References to deleted blogs are dropped here rather than surfaced.
            let owned = user
                .blog_ids
                .iter()
                .filter_map(|id| blogs.get(id))
                .map(BlogSummary::from)
                .collect();
            UserResponse::new(user, owned)
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}
