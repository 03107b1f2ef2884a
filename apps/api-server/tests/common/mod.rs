//! Shared fixtures for the HTTP tests.

#![allow(dead_code)]

use api_server::state::AppState;
use bloglist_core::domain::{Blog, User};
use bloglist_infra::auth::JwtConfig;

pub fn test_state() -> AppState {
    AppState::in_memory(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    })
}

pub fn initial_blogs() -> Vec<Blog> {
    vec![
        Blog::new(
            None,
            "React patterns".to_string(),
            Some("Michael Chan".to_string()),
            "https://reactpatterns.com/".to_string(),
            7,
        ),
        Blog::new(
            None,
            "Go To Statement Considered Harmful".to_string(),
            Some("Edsger W. Dijkstra".to_string()),
            "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html"
                .to_string(),
            5,
        ),
    ]
}

pub async fn seed_blogs(state: &AppState, blogs: Vec<Blog>) {
    for blog in blogs {
        state.blogs.create(blog).await.unwrap();
    }
}

pub async fn blogs_in_db(state: &AppState) -> Vec<Blog> {
    state.blogs.find_all().await.unwrap()
}

/// Insert a user directly (skipping password hashing) and issue a token for it.
pub async fn user_with_token(state: &AppState, username: &str) -> (User, String) {
    let user = state
        .users
        .create(User::new(
            username.to_string(),
            Some(format!("{username} tester")),
            "unused-hash".to_string(),
        ))
        .await
        .unwrap();
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {token}"),
    )
}
