use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Blog, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key collisions surface as `RepoError::Constraint`.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;

    /// Remove every entity, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// All users, oldest first.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;

    /// Find a user by their (unique) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup; ids with no matching user are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// Append a blog reference to the user's list in one write.
    /// Fails with `RepoError::NotFound` if the user is gone.
    async fn attach_blog(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), RepoError>;

    /// Remove a blog reference from the user's list in one write.
    async fn detach_blog(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), RepoError>;
}

/// Blog repository.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, Uuid> {
    /// All blogs, oldest first.
    async fn find_all(&self) -> Result<Vec<Blog>, RepoError>;

    /// Batch lookup; ids with no matching blog are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Blog>, RepoError>;
}
