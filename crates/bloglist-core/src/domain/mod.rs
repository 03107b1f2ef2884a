//! Domain entities - the core business objects.

mod blog;
mod user;

pub use blog::{Blog, BlogChanges};
pub use user::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, User};
