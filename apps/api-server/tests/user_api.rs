mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use api_server::build_app;

use common::{bearer, initial_blogs, seed_blogs, test_state};

#[actix_web::test]
async fn test_creation_succeeds_with_fresh_username() {
    let state = test_state();
    let app = test::init_service(build_app(state.clone(), true)).await;

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "mluukkai", "name": "Matti Luukkainen", "password": "salainen"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "mluukkai");
    assert_eq!(body["blogs"], json!([]));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let users = state.users.find_all().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_ne!(users[0].password_hash, "salainen");
}

#[actix_web::test]
async fn test_duplicate_username_is_rejected() {
    let state = test_state();
    let app = test::init_service(build_app(state.clone(), true)).await;
    let user = json!({"username": "root", "name": "Superuser", "password": "sekret"});

    let first = test::TestRequest::post().uri("/api/users").set_json(user.clone()).to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let second = test::TestRequest::post().uri("/api/users").set_json(user).to_request();
    let resp = test::call_service(&app, second).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("expected `username` to be unique"));
    assert_eq!(state.users.find_all().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_short_credentials_are_rejected() {
    let state = test_state();
    let app = test::init_service(build_app(state.clone(), true)).await;

    let short_password = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "validname", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, short_password).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("`password`"));

    let short_username = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "ab", "password": "longenough"}))
        .to_request();
    assert_eq!(test::call_service(&app, short_username).await.status(), StatusCode::BAD_REQUEST);

    let missing_both = test::TestRequest::post().uri("/api/users").set_json(json!({})).to_request();
    assert_eq!(test::call_service(&app, missing_both).await.status(), StatusCode::BAD_REQUEST);

    assert!(state.users.find_all().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_login_and_post_with_returned_token() {
    let state = test_state();
    let app = test::init_service(build_app(state.clone(), true)).await;

    let register = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "hellas", "name": "Arto Hellas", "password": "secret"}))
        .to_request();
    assert_eq!(test::call_service(&app, register).await.status(), StatusCode::CREATED);

    let login = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({"username": "hellas", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "hellas");
    assert_eq!(body["name"], "Arto Hellas");
    let token = body["token"].as_str().unwrap().to_string();

    let claims = state.tokens.validate_token(&token).unwrap();
    assert_eq!(claims.username, "hellas");

    let post = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token))
        .set_json(json!({"title": "Things I don't know as of 2018", "url": "https://overreacted.io/things-i-dont-know-as-of-2018/"}))
        .to_request();
    assert_eq!(test::call_service(&app, post).await.status(), StatusCode::CREATED);

    // The user listing embeds the new blog.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password_hash").is_none());
    assert!(users[0].get("passwordHash").is_none());
    assert!(!users[0].to_string().contains("$argon2"));
    assert_eq!(users[0]["blogs"][0]["title"], "Things I don't know as of 2018");
    assert!(users[0]["blogs"][0].get("likes").is_none());
}

#[actix_web::test]
async fn test_failed_logins_are_indistinguishable() {
    let state = test_state();
    let app = test::init_service(build_app(state.clone(), true)).await;

    let register = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "root", "password": "sekret"}))
        .to_request();
    assert_eq!(test::call_service(&app, register).await.status(), StatusCode::CREATED);

    let wrong_password = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({"username": "root", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, wrong_password).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body: Value = test::read_body_json(resp).await;

    let unknown_user = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({"username": "nobody", "password": "sekret"}))
        .to_request();
    let resp = test::call_service(&app, unknown_user).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user_body: Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(wrong_password_body["detail"], "invalid username or password");
}

#[actix_web::test]
async fn test_reset_empties_both_collections() {
    let state = test_state();
    seed_blogs(&state, initial_blogs()).await;
    common::user_with_token(&state, "root").await;
    let app = test::init_service(build_app(state.clone(), true)).await;

    let resp = test::call_service(&app, test::TestRequest::post().uri("/api/testing/reset").to_request()).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(state.blogs.find_all().await.unwrap().is_empty());
    assert!(state.users.find_all().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_reset_is_not_mounted_outside_test_mode() {
    let state = test_state();
    seed_blogs(&state, initial_blogs()).await;
    let app = test::init_service(build_app(state.clone(), false)).await;

    let resp = test::call_service(&app, test::TestRequest::post().uri("/api/testing/reset").to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.blogs.find_all().await.unwrap().len(), initial_blogs().len());
}
