//! Fixture reset for end-to-end test suites. Only mounted in test mode.

use actix_web::{HttpResponse, web};

use crate::middleware::AppResult;
use crate::state::AppState;

/// POST /api/testing/reset
pub async fn reset(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blogs = state.blogs.delete_all().await?;
    let users = state.users.delete_all().await?;

    tracing::warn!(blogs, users, "Test store reset");

    Ok(HttpResponse::NoContent().finish())
}
