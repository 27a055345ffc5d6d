//! Request identity extractor.
//!
//! Every request acts as an [`Actor`]. A valid `Authorization: Bearer <jwt>`
//! header makes it that user; a missing or unusable token makes it anonymous,
//! and the handler decides whether anonymous is good enough.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use yatube_core::domain::Actor;
use yatube_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;

/// The actor of the current request.
///
/// ```ignore
/// async fn whoami(CurrentActor(actor): CurrentActor) -> AppResult<HttpResponse> {
///     let user_id = actor.require_user()?;
///     Ok(HttpResponse::Ok().json(user_id))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl From<TokenClaims> for CurrentActor {
    fn from(claims: TokenClaims) -> Self {
        Self(Actor::user(claims.user_id, claims.username))
    }
}

/// The raw token of a `Bearer` authorization header.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn resolve_actor(req: &HttpRequest) -> Result<CurrentActor, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let token = bearer_token(req)?;
    state.tokens.validate_token(token).map(CurrentActor::from)
}

impl FromRequest for CurrentActor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match resolve_actor(req) {
            Ok(actor) => ready(Ok(actor)),
            Err(AuthError::MissingAuth) => ready(Ok(CurrentActor(Actor::Anonymous))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credentials");
                ready(Ok(CurrentActor(Actor::Anonymous)))
            }
        }
    }
}
