//! Authentication handlers.

use actix_web::{HttpResponse, web};

use yatube_core::domain::{NewUser, User, is_valid_username};
use yatube_shared::ApiResponse;
use yatube_shared::dto::{
    AuthResponse, LoginPromptResponse, LoginQuery, LoginRequest, SignupRequest,
};

use super::LOGIN_URL;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// Only same-site paths are echoed back as `next`.
fn local_path(next: Option<String>) -> Option<String> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
}

fn issue_token(state: &AppState, user: &User, next: Option<String>) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        username: user.username.clone(),
        next,
    })
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim().to_string();

    if !is_valid_username(&username) {
        return Err(AppError::BadRequest(
            "Username may contain only letters, digits and @/./+/-/_ characters".to_string(),
        ));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state.users.insert(NewUser::new(username, password_hash)).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok(HttpResponse::Created().json(ApiResponse::ok(issue_token(&state, &user, None)?)))
}

/// GET /auth/login/
pub async fn login_page(query: web::Query<LoginQuery>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(LoginPromptResponse {
        login_url: LOGIN_URL.to_string(),
        next: local_path(query.into_inner().next),
    }))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    query: web::Query<LoginQuery>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(username = %user.username, "Rejected login");
        return Err(AppError::Unauthorized);
    }

    let next = local_path(query.into_inner().next);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(issue_token(&state, &user, next)?)))
}
