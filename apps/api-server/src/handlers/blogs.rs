//! Blog handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloglist_core::DomainError;
use bloglist_core::domain::{Blog, User};
use bloglist_shared::dto::{
    BlogResponse, BlogWithOwnerResponse, CreateBlogRequest, UpdateBlogRequest,
};

use super::parse_id;
use crate::middleware::{AppResult, AuthenticatedUser};
use crate::state::AppState;

async fn find_blog(state: &AppState, id: Uuid) -> AppResult<Blog> {
    state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound {
                entity_type: "blog",
                id,
            }
            .into()
        })
}

/// GET /api/blogs
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blogs = state.blogs.find_all().await?;

    let mut owner_ids: Vec<Uuid> = blogs.iter().filter_map(|b| b.user_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let owners: HashMap<Uuid, User> = state
        .users
        .find_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let body: Vec<BlogWithOwnerResponse> = blogs
        .iter()
        .map(|blog| {
            let owner = blog.user_id.and_then(|id| owners.get(&id));
            BlogWithOwnerResponse::new(blog, owner)
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/blogs/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let blog = find_blog(&state, id).await?;

    Ok(HttpResponse::Ok().json(BlogResponse::from(&blog)))
}

/// POST /api/blogs - Protected route
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let blog = Blog::new(
        Some(user.id),
        req.title.unwrap_or_default(),
        req.author,
        req.url.unwrap_or_default(),
        req.likes.unwrap_or(0),
    );
    blog.validate()?;

    let saved = state.blogs.create(blog).await?;

    // Separate write: a failure here leaves the blog without a back-reference.
    state.users.attach_blog(user.id, saved.id).await?;

    tracing::info!(blog_id = %saved.id, username = %user.username, "Blog created");

    Ok(HttpResponse::Created().json(BlogResponse::from(&saved)))
}

/// PUT /api/blogs/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let mut blog = find_blog(&state, id).await?;

    blog.apply(body.into_inner().into())?;
    let saved = state.blogs.update(blog).await?;

    Ok(HttpResponse::Ok().json(BlogResponse::from(&saved)))
}

/// DELETE /api/blogs/{id} - Protected route, owner only
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let blog = find_blog(&state, id).await?;

    if !blog.is_owned_by(user.id) {
        tracing::warn!(blog_id = %id, username = %user.username, "Refusing to delete blog owned by another user");
        return Err(DomainError::Forbidden("blog").into());
    }

    state.blogs.delete(id).await?;

    state.users.detach_blog(user.id, id).await?;

    tracing::info!(blog_id = %id, "Blog deleted");

    Ok(HttpResponse::NoContent().finish())
}
