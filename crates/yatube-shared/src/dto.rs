//! Data Transfer Objects - request/response types for the API.
//!
//! Response bodies mirror the page contexts of the site: a feed carries a
//! `page_obj`, forms carry their bound values, errors and `is_edit`.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Query string of the login page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// What the login page shows: where to post credentials and where to go after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPromptResponse {
    pub login_url: String,
    pub next: Option<String>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Query string of paginated pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// A post form submission. Unknown fields, including `author`, are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub created_at: String,
    pub author: AuthorResponse,
    pub group: Option<GroupResponse>,
}

/// One page of a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

/// Context of `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub page_obj: PageResponse<PostResponse>,
}

/// Context of `/group/{slug}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFeedResponse {
    pub group: GroupResponse,
    pub page_obj: PageResponse<PostResponse>,
}

/// Context of `/profile/{username}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub author: AuthorResponse,
    pub post_count: u64,
    pub page_obj: PageResponse<PostResponse>,
}

/// Context of `/posts/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub post_count: u64,
}

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Context of the create and edit forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormResponse {
    pub form: PostFormRequest,
    pub errors: Vec<FieldErrorResponse>,
    pub groups: Vec<GroupResponse>,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
}
