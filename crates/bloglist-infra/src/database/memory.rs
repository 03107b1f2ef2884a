//! In-memory repositories - used when no database is configured and in tests.
//!
//! Records are kept in insertion order so listings are stable.
//! Note: Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bloglist_core::domain::{Blog, User};
use bloglist_core::error::RepoError;
use bloglist_core::ports::{BaseRepository, BlogRepository, UserRepository};

/// In-memory blog store.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    store: RwLock<Vec<Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Blog, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut store = self.store.write().await;
        if store.iter().any(|b| b.id == blog.id) {
            return Err(RepoError::Constraint(format!("blog {} already exists", blog.id)));
        }
        store.push(blog.clone());
        Ok(blog)
    }

    async fn update(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut store = self.store.write().await;
        let slot = store
            .iter_mut()
            .find(|b| b.id == blog.id)
            .ok_or(RepoError::NotFound)?;
        *slot = blog.clone();
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|b| b.id != id);
        if store.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let removed = store.len() as u64;
        store.clear();
        Ok(removed)
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        Ok(self.store.read().await.clone())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Blog>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().filter(|b| ids.contains(&b.id)).cloned().collect())
    }
}

/// In-memory user store. Enforces username uniqueness like the database index.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        if store.iter().any(|u| u.id == user.id) {
            return Err(RepoError::Constraint(format!("user {} already exists", user.id)));
        }
        store.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        let slot = store
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|u| u.id != id);
        if store.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let removed = store.len() as u64;
        store.clear();
        Ok(removed)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.store.read().await.clone())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn attach_blog(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let user = store
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(RepoError::NotFound)?;
        user.add_blog(blog_id);
        Ok(())
    }

    async fn detach_blog(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let user = store
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(RepoError::NotFound)?;
        user.remove_blog(blog_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(title: &str, owner: Option<Uuid>) -> Blog {
        Blog::new(owner, title.to_string(), None, "https://example.com".to_string(), 0)
    }

    #[tokio::test]
    async fn test_blog_create_and_list_in_order() {
        let repo = InMemoryBlogRepository::new();
        repo.create(blog("first", None)).await.unwrap();
        repo.create(blog("second", None)).await.unwrap();

        let titles: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();

        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_blog_update_missing_is_not_found() {
        let repo = InMemoryBlogRepository::new();

        let result = repo.update(blog("ghost", None)).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_blog_delete() {
        let repo = InMemoryBlogRepository::new();
        let saved = repo.create(blog("doomed", None)).await.unwrap();

        repo.delete(saved.id).await.unwrap();

        assert!(repo.find_by_id(saved.id).await.unwrap().is_none());
        assert!(matches!(repo.delete(saved.id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("root".into(), None, "h1".into()))
            .await
            .unwrap();

        let result = repo
            .create(User::new("root".into(), Some("Other".into()), "h2".into()))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_find_by_ids_skips_unknown() {
        let repo = InMemoryUserRepository::new();
        let a = repo
            .create(User::new("alice".into(), None, "h".into()))
            .await
            .unwrap();

        let found = repo.find_by_ids(&[a.id, Uuid::new_v4()]).await.unwrap();

        assert_eq!(found, vec![a]);
    }

    #[tokio::test]
    async fn test_concurrent_attach_keeps_every_blog() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(User::new("root".into(), None, "h".into()))
            .await
            .unwrap();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());

        let (a, b) = tokio::join!(
            repo.attach_blog(user.id, first),
            repo.attach_blog(user.id, second)
        );
        a.unwrap();
        b.unwrap();

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.blog_ids.len(), 2);
        assert!(stored.blog_ids.contains(&first) && stored.blog_ids.contains(&second));

        repo.detach_blog(user.id, first).await.unwrap();
        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.blog_ids, vec![second]);
    }

    #[tokio::test]
    async fn test_attach_to_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();

        let result = repo.attach_blog(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_all_reports_count() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("alice".into(), None, "h".into()))
            .await
            .unwrap();
        repo.create(User::new("bob".into(), None, "h".into()))
            .await
            .unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
