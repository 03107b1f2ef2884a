use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// User entity - represents a user in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    /// References to the blogs this user created, oldest first.
    pub blog_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            name,
            password_hash,
            blog_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate registration input before the password is hashed.
    pub fn validate_registration(username: &str, password: &str) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        if username.trim().is_empty() {
            problems.push("`username` is required".to_string());
        } else if username.chars().count() < MIN_USERNAME_LENGTH {
            problems.push(format!(
                "`username` must be at least {MIN_USERNAME_LENGTH} characters long"
            ));
        }

        if password.is_empty() {
            problems.push("`password` is required".to_string());
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            problems.push(format!(
                "`password` must be at least {MIN_PASSWORD_LENGTH} characters long"
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems.join(", ")))
        }
    }

    /// Record ownership of a newly created blog.
    pub fn add_blog(&mut self, blog_id: Uuid) {
        if !self.blog_ids.contains(&blog_id) {
            self.blog_ids.push(blog_id);
            self.updated_at = Utc::now();
        }
    }

    /// Drop the reference to a deleted blog. Returns whether it was present.
    pub fn remove_blog(&mut self, blog_id: Uuid) -> bool {
        let before = self.blog_ids.len();
        self.blog_ids.retain(|id| *id != blog_id);
        let removed = self.blog_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}
