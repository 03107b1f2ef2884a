//! Data Transfer Objects - request/response types for the API.
//!
//! Responses are built from domain entities through the constructors below.
//! Storage ids become opaque strings and credential hashes are never copied.

use serde::{Deserialize, Serialize};

use bloglist_core::domain::{Blog, BlogChanges, User};

/// Request to create a blog. Required fields are checked by the domain, so a
/// missing field is a validation failure rather than a decoding error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request to update a blog. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl From<UpdateBlogRequest> for BlogChanges {
    fn from(req: UpdateBlogRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

/// A blog as stored, with its owner as a plain id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub id: String,
}

impl From<&Blog> for BlogResponse {
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user: blog.user_id.map(|id| id.to_string()),
            id: blog.id.to_string(),
        }
    }
}

/// A blog with its owner's public summary embedded, used by the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogWithOwnerResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    pub id: String,
}

impl BlogWithOwnerResponse {
    pub fn new(blog: &Blog, owner: Option<&User>) -> Self {
        Self {
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user: owner.map(UserSummary::from),
            id: blog.id.to_string(),
        }
    }
}

/// Owner details embedded in a blog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            id: user.id.to_string(),
        }
    }
}

/// Blog details embedded in a user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub id: String,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            id: blog.id.to_string(),
        }
    }
}

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub username: String,
    pub name: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub blogs: Vec<BlogSummary>,
    pub id: String,
}

impl UserResponse {
    /// `blogs` should be the user's own blogs, already resolved from `user.blog_ids`.
    pub fn new(user: &User, blogs: Vec<BlogSummary>) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            blogs,
            id: user.id.to_string(),
        }
    }
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        User::new(
            "mluukkai".to_string(),
            Some("Matti Luukkainen".to_string()),
            "$argon2id$v=19$secret".to_string(),
        )
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = user();
        let json = serde_json::to_string(&UserResponse::new(&user, vec![])).unwrap();

        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains(&format!("\"id\":\"{}\"", user.id)));
    }

    #[test]
    fn test_blog_response_renames_owner_reference() {
        let owner = Uuid::new_v4();
        let blog = Blog::new(
            Some(owner),
            "React patterns".into(),
            Some("Michael Chan".into()),
            "https://reactpatterns.com/".into(),
            0,
        );

        let value = serde_json::to_value(BlogResponse::from(&blog)).unwrap();

        assert_eq!(value["id"], blog.id.to_string());
        assert_eq!(value["user"], owner.to_string());
        assert_eq!(value["likes"], 0);
        assert!(value.get("user_id").is_none());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_blog_listing_embeds_owner_summary() {
        let user = user();
        let blog = Blog::new(Some(user.id), "t".into(), None, "u".into(), 3);

        let value = serde_json::to_value(BlogWithOwnerResponse::new(&blog, Some(&user))).unwrap();

        assert_eq!(value["user"]["username"], "mluukkai");
        assert_eq!(value["user"]["name"], "Matti Luukkainen");
        assert_eq!(value["user"]["id"], user.id.to_string());
        assert!(value.get("author").is_none());
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        let req: CreateBlogRequest = serde_json::from_str(r#"{"author":"Michael Chan"}"#).unwrap();

        assert!(req.title.is_none());
        assert!(req.url.is_none());
        assert_eq!(req.author.as_deref(), Some("Michael Chan"));
    }
}
