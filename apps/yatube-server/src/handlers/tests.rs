use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use yatube_core::domain::{Actor, Group, NewGroup, NewUser, Post, User};
use yatube_core::form::PostInput;
use yatube_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn app_state() -> AppState {
    AppState::in_memory(
        10,
        Arc::new(JwtTokenService::new(JwtConfig::default())),
        Arc::new(Argon2PasswordService::with_cost(1024, 1, 1).unwrap()),
    )
}

/// A stored user and the `Authorization` header value that signs in as them.
async fn user(state: &AppState, username: &str) -> (User, String) {
    let user = state
        .users
        .insert(NewUser::new(username.to_string(), "hash".to_string()))
        .await
        .unwrap();
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .unwrap();
    (user, format!("Bearer {token}"))
}

async fn group(state: &AppState, slug: &str) -> Group {
    state
        .groups
        .insert(NewGroup::new("Тестовая группа", slug, "Тестовое описание").unwrap())
        .await
        .unwrap()
}

async fn post(state: &AppState, author: &User, text: &str, group_id: Option<i64>) -> Post {
    state
        .posts
        .create_post(
            PostInput {
                text: text.to_string(),
                group: group_id,
            },
            &Actor::user(author.id, &author.username),
        )
        .await
        .unwrap()
}

async fn post_count(state: &AppState) -> u64 {
    state.posts.index(1).await.unwrap().total_items
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_pages_answer_authorized_client() {
    let state = app_state();
    let (author, auth) = user(&state, "auth").await;
    let group = group(&state, "test-slug").await;
    let post = post(&state, &author, "Тестовый пост", Some(group.id)).await;
    let app = init_app!(state);

    let pages = [
        "/".to_string(),
        "/group/test-slug/".to_string(),
        "/profile/auth/".to_string(),
        format!("/posts/{}/", post.id),
        "/create/".to_string(),
        format!("/posts/{}/edit/", post.id),
    ];
    for uri in pages {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, auth.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }

    let req = test::TestRequest::get().uri("/unexisting_page/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["instance"], "/unexisting_page/");
}

#[actix_web::test]
async fn test_anonymous_is_sent_to_login() {
    let state = app_state();
    let (author, _) = user(&state, "auth").await;
    let post = post(&state, &author, "Тестовый пост", None).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/create/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let edit = format!("/posts/{}/edit/", post.id);
    let req = test::TestRequest::get().uri(&edit).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/auth/login/?next={edit}"));

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_json(json!({ "text": "anonymous" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(post_count(&state).await, 1);
}

#[actix_web::test]
async fn test_anonymous_post_is_redirected_whatever_the_body() {
    let state = app_state();
    let (author, _) = user(&state, "auth").await;
    let post = post(&state, &author, "Тестовый пост", None).await;
    let app = init_app!(state);
    let edit = format!("/posts/{}/edit/", post.id);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("text=anonymous")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let req = test::TestRequest::post().uri("/create/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let req = test::TestRequest::post().uri(&edit).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/auth/login/?next={edit}"));

    assert_eq!(post_count(&state).await, 1);
    let detail = state.posts.post_detail(post.id).await.unwrap();
    assert_eq!(detail.entry.post.text, "Тестовый пост");
}

#[actix_web::test]
async fn test_login_redirect_keeps_query() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/create/?page=2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let login = location(&resp);
    assert_eq!(login, "/auth/login/?next=/create/%3Fpage%3D2");

    let req = test::TestRequest::get().uri(&login).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["next"], "/create/?page=2");
}

#[actix_web::test]
async fn test_unusable_token_is_anonymous() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
}

#[actix_web::test]
async fn test_create_adds_post_and_redirects_to_profile() {
    let state = app_state();
    let (_, auth) = user(&state, "auth").await;
    let group = group(&state, "test-slug").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .set_json(json!({ "text": "Тестовый текст", "group": group.id, "author": 999 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/auth/");
    assert_eq!(post_count(&state).await, 1);

    let newest = &state.posts.index(1).await.unwrap().items[0];
    assert_eq!(newest.post.text, "Тестовый текст");
    assert_eq!(newest.author.username, "auth");
    assert_eq!(newest.group.as_ref(), Some(&group));
}

#[actix_web::test]
async fn test_invalid_form_is_returned_with_errors() {
    let state = app_state();
    let (_, auth) = user(&state, "auth").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .set_json(json!({ "text": "   ", "group": 404 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["is_edit"], false);
    assert_eq!(body["data"]["form"]["text"], "   ");
    let codes: Vec<&str> = body["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["EMPTY_TEXT", "UNKNOWN_GROUP"]);
    assert_eq!(post_count(&state).await, 0);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let state = app_state();
    let (_, auth) = user(&state, "auth").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_author_edit_replaces_text() {
    let state = app_state();
    let (author, auth) = user(&state, "auth").await;
    let post = post(&state, &author, "Тестовый пост", None).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["is_edit"], true);
    assert_eq!(body["data"]["form"]["text"], "Тестовый пост");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .set_json(json!({ "text": "Проверка редактирования" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let detail = state.posts.post_detail(post.id).await.unwrap();
    assert_eq!(detail.entry.post.text, "Проверка редактирования");
    assert_eq!(detail.entry.post.created_at, post.created_at);
    assert_eq!(detail.entry.author.username, "auth");
}

#[actix_web::test]
async fn test_non_author_is_sent_back_to_post() {
    let state = app_state();
    let (author, _) = user(&state, "auth").await;
    let (_, other) = user(&state, "other").await;
    let post = post(&state, &author, "Тестовый пост", None).await;
    let app = init_app!(state);
    let edit = format!("/posts/{}/edit/", post.id);

    let req = test::TestRequest::get()
        .uri(&edit)
        .insert_header((header::AUTHORIZATION, other.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&edit)
        .insert_header((header::AUTHORIZATION, other.as_str()))
        .set_json(json!({ "text": "Чужая правка" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&edit)
        .insert_header((header::AUTHORIZATION, other.as_str()))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let detail = state.posts.post_detail(post.id).await.unwrap();
    assert_eq!(detail.entry.post.text, "Тестовый пост");
}

#[actix_web::test]
async fn test_missing_and_malformed_posts_are_not_found() {
    let state = app_state();
    let (_, auth) = user(&state, "auth").await;
    let app = init_app!(state);

    for uri in ["/posts/abc/", "/posts/999/", "/group/missing/", "/profile/nobody/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    let req = test::TestRequest::get()
        .uri("/posts/999/edit/")
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/posts/999/edit/")
        .insert_header((header::AUTHORIZATION, auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_feeds_paginate_thirteen_posts() {
    let state = app_state();
    let (author, _) = user(&state, "auth").await;
    for i in 0..13 {
        post(&state, &author, &format!("Пост {i}"), None).await;
    }
    let app = init_app!(state);

    let cases = [
        ("/", 1, 10),
        ("/?page=2", 2, 3),
        ("/?page=abc", 1, 10),
        ("/?page=0", 1, 10),
        ("/?page=99", 2, 3),
        ("/profile/auth/", 1, 10),
        ("/profile/auth/?page=2", 2, 3),
    ];
    for (uri, number, len) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let page = &body["data"]["page_obj"];
        assert_eq!(page["number"], number, "GET {uri}");
        assert_eq!(page["items"].as_array().unwrap().len(), len, "GET {uri}");
        assert_eq!(page["num_pages"], 2);
        assert_eq!(page["count"], 13);
    }

    let req = test::TestRequest::get().uri("/profile/auth/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["post_count"], 13);
    assert_eq!(body["data"]["page_obj"]["has_next"], true);
    assert_eq!(body["data"]["page_obj"]["next_page_number"], 2);
}

#[actix_web::test]
async fn test_ungrouped_post_stays_out_of_group_feed() {
    let state = app_state();
    let (author, _) = user(&state, "auth").await;
    group(&state, "test-slug").await;
    let post = post(&state, &author, "Тестовый пост", None).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/group/test-slug/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["group"]["slug"], "test-slug");
    assert!(body["data"]["page_obj"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["page_obj"]["num_pages"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["post"]["text"], "Тестовый пост");
    assert_eq!(body["data"]["post"]["author"]["username"], "auth");
    assert!(body["data"]["post"]["group"].is_null());
    assert_eq!(body["data"]["post_count"], 1);
}

#[actix_web::test]
async fn test_signup_then_login() {
    let state = app_state();
    let app = init_app!(state);
    let credentials = json!({ "username": "leo", "password": "correct-horse" });

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(json!({ "username": "bad name", "password": "correct-horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=/create/")
        .set_json(json!({ "username": "leo", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=/create/")
        .set_json(&credentials)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "leo");
    assert_eq!(body["data"]["next"], "/create/");
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_page_echoes_next() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=/posts/1/edit/")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["login_url"], "/auth/login/");
    assert_eq!(body["data"]["next"], "/posts/1/edit/");
}

#[actix_web::test]
async fn test_health() {
    let state = app_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
