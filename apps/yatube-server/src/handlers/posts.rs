//! Post pages: the three feeds, post detail and the create/edit forms.
//!
//! Pages that need a signed-in author never answer anonymous clients with an
//! error body. They are redirected to the login page with `next` set to the
//! requested path, and a signed-in non-author is sent back to the post.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use url::form_urlencoded;

use yatube_core::domain::{Actor, PostId};
use yatube_core::error::DomainError;
use yatube_core::form::ValidationErrors;
use yatube_core::pagination::parse_page_number;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{
    GroupFeedResponse, IndexResponse, PageQuery, PostDetailResponse, PostFormRequest,
    ProfileResponse,
};

use super::{LOGIN_URL, context};
use crate::middleware::auth::CurrentActor;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn page_number(query: &PageQuery) -> i64 {
    parse_page_number(query.page.as_deref())
}

fn post_url(post_id: PostId) -> String {
    format!("/posts/{}/", post_id)
}

fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

/// `next` keeps the query string; slashes stay readable.
fn login_redirect(req: &HttpRequest) -> AppError {
    let requested = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path(), |pq| pq.as_str());
    let next = form_urlencoded::byte_serialize(requested.as_bytes())
        .collect::<String>()
        .replace("%2F", "/");
    AppError::Redirect(format!("{}?next={}", LOGIN_URL, next))
}

/// Decode a submitted post form. Only called once the access checks pass.
fn read_form(body: &[u8]) -> AppResult<PostFormRequest> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid post form: {e}")))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Access failures become redirects; everything else keeps its status.
fn deny(err: DomainError, req: &HttpRequest) -> AppError {
    match err {
        DomainError::AuthenticationRequired => login_redirect(req),
        DomainError::AuthorizationDenied { id, .. } => AppError::Redirect(post_url(id)),
        other => other.into(),
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.index(page_number(&query)).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(IndexResponse {
        page_obj: context::page(page),
    })))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.posts.group_posts(&slug, page_number(&query)).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(GroupFeedResponse {
        group: context::group(feed.group),
        page_obj: context::page(feed.page),
    })))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.posts.profile(&username, page_number(&query)).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        author: context::author(feed.author),
        post_count: feed.post_count,
        page_obj: context::page(feed.page),
    })))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.post_detail(post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: context::post(detail.entry),
        post_count: detail.author_post_count,
    })))
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<HttpResponse> {
    if !actor.is_authenticated() {
        return Err(login_redirect(&req));
    }

    form_page(&state, PostFormRequest::default(), None).await
}

/// POST /create/
pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    CurrentActor(actor): CurrentActor,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let Actor::User { username, .. } = &actor else {
        return Err(login_redirect(&req));
    };
    let form = read_form(&body)?;

    match state.posts.create_post(context::input(&form), &actor).await {
        Ok(_) => Ok(redirect(&profile_url(username))),
        Err(DomainError::Validation(errors)) => rejected_form(&state, form, &errors, None).await,
        Err(err) => Err(deny(err, &req)),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    CurrentActor(actor): CurrentActor,
    post_id: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let post = state
        .posts
        .edit_form(post_id, &actor)
        .await
        .map_err(|e| deny(e, &req))?;

    let form = PostFormRequest {
        text: post.text,
        group: post.group_id,
    };
    form_page(&state, form, Some(post_id)).await
}

/// POST /posts/{post_id}/edit/
pub async fn edit_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    CurrentActor(actor): CurrentActor,
    post_id: web::Path<PostId>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    state
        .posts
        .edit_form(post_id, &actor)
        .await
        .map_err(|e| deny(e, &req))?;
    let form = read_form(&body)?;

    match state
        .posts
        .edit_post(post_id, context::input(&form), &actor)
        .await
    {
        Ok(post) => Ok(redirect(&post_url(post.id))),
        Err(DomainError::Validation(errors)) => {
            rejected_form(&state, form, &errors, Some(post_id)).await
        }
        Err(err) => Err(deny(err, &req)),
    }
}

async fn form_page(
    state: &AppState,
    form: PostFormRequest,
    post_id: Option<PostId>,
) -> AppResult<HttpResponse> {
    let groups = state.posts.group_choices().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(context::form(
        form,
        Vec::new(),
        groups,
        post_id,
    ))))
}

/// The form again, with the submitted values and what was wrong with them.
async fn rejected_form(
    state: &AppState,
    form: PostFormRequest,
    errors: &ValidationErrors,
    post_id: Option<PostId>,
) -> AppResult<HttpResponse> {
    tracing::debug!(errors = %errors, ?post_id, "Post form rejected");
    let groups = state.posts.group_choices().await?;
    let ctx = context::form(form, context::field_errors(errors), groups, post_id);

    Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::rejected(ctx, "Form contains errors")))
}
