//! Domain values to response contexts.

use yatube_core::Page;
use yatube_core::domain::{Author, Group, PostEntry};
use yatube_core::form::{PostInput, ValidationErrors};
use yatube_shared::dto::{
    AuthorResponse, FieldErrorResponse, GroupResponse, PageResponse, PostFormRequest,
    PostFormResponse, PostResponse,
};

pub fn group(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn post(entry: PostEntry) -> PostResponse {
    PostResponse {
        id: entry.post.id,
        text: entry.post.text,
        created_at: entry.post.created_at.to_rfc3339(),
        author: author(entry.author),
        group: entry.group.map(group),
    }
}

/// The `page_obj` of a feed.
pub fn page(page: Page<PostEntry>) -> PageResponse<PostResponse> {
    PageResponse {
        number: page.number,
        num_pages: page.num_pages,
        count: page.total_items,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page_number: page.next_page_number(),
        previous_page_number: page.previous_page_number(),
        items: page.items.into_iter().map(post).collect(),
    }
}

pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldErrorResponse> {
    errors
        .iter()
        .map(|e| FieldErrorResponse {
            field: e.field.to_string(),
            code: e.code.as_str().to_string(),
            message: e.message.to_string(),
        })
        .collect()
}

pub fn form(
    form: PostFormRequest,
    errors: Vec<FieldErrorResponse>,
    groups: Vec<Group>,
    post_id: Option<i64>,
) -> PostFormResponse {
    PostFormResponse {
        form,
        errors,
        groups: groups.into_iter().map(group).collect(),
        is_edit: post_id.is_some(),
        post_id,
    }
}

/// What the service validates out of a submitted form.
pub fn input(form: &PostFormRequest) -> PostInput {
    PostInput {
        text: form.text.clone(),
        group: form.group,
    }
}
