use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Blog entity - a link to an article, with a like counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    /// Owner reference. Fixture data inserted straight into the store may have none.
    pub user_id: Option<Uuid>,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a blog's mutable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl Blog {
    /// Create a new blog owned by `user_id`.
    pub fn new(
        user_id: Option<Uuid>,
        title: String,
        author: Option<String>,
        url: String,
        likes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            author,
            url,
            likes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the required fields, reporting every violation at once.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        if self.title.trim().is_empty() {
            problems.push("`title` is required");
        }
        if self.url.trim().is_empty() {
            problems.push("`url` is required");
        }
        if self.likes < 0 {
            problems.push("`likes` must not be negative");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems.join(", ")))
        }
    }

    /// Apply `changes`, leaving `self` untouched if the result would be invalid.
    pub fn apply(&mut self, changes: BlogChanges) -> Result<(), DomainError> {
        let mut updated = self.clone();

        if let Some(title) = changes.title {
            updated.title = title;
        }
        if let Some(author) = changes.author {
            updated.author = Some(author);
        }
        if let Some(url) = changes.url {
            updated.url = url;
        }
        if let Some(likes) = changes.likes {
            updated.likes = likes;
        }

        updated.validate()?;
        updated.updated_at = Utc::now();
        *self = updated;
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Blog {
        Blog::new(
            Some(Uuid::new_v4()),
            "React patterns".to_string(),
            Some("Michael Chan".to_string()),
            "https://reactpatterns.com/".to_string(),
            7,
        )
    }

    #[test]
    fn test_valid_blog_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_missing_title_and_url_reported_together() {
        let blog = Blog::new(None, String::new(), None, "  ".to_string(), 0);

        let err = blog.validate().unwrap_err();
        let DomainError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("`title`"));
        assert!(msg.contains("`url`"));
    }

    #[test]
    fn test_apply_updates_likes() {
        let mut blog = sample();
        blog.apply(BlogChanges {
            likes: Some(8),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(blog.likes, 8);
        assert_eq!(blog.title, "React patterns");
    }

    #[test]
    fn test_apply_rejects_blank_title_without_mutating() {
        let mut blog = sample();
        let before = blog.clone();

        let result = blog.apply(BlogChanges {
            title: Some(String::new()),
            likes: Some(100),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(blog, before);
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let blog = Blog::new(Some(owner), "t".into(), None, "u".into(), 0);

        assert!(blog.is_owned_by(owner));
        assert!(!blog.is_owned_by(Uuid::new_v4()));
        assert!(!Blog::new(None, "t".into(), None, "u".into(), 0).is_owned_by(owner));
    }
}
