//! Middleware modules.

pub mod auth;
pub mod error;

pub use auth::{AuthenticatedUser, BearerToken, TokenExtractor};
pub use error::{AppError, AppResult};
