//! Who may change a post.

use crate::domain::{Actor, Post};
use crate::error::DomainError;

/// Outcome of an edit permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAccess {
    Authorized,
    Denied,
}

/// Only the post's author may edit it. Anonymous actors are always denied.
pub fn edit_access(actor: &Actor, post: &Post) -> EditAccess {
    match actor.user_id() {
        Some(user_id) if post.is_authored_by(user_id) => EditAccess::Authorized,
        _ => EditAccess::Denied,
    }
}

/// [`edit_access`] as a result: anonymous actors get `AuthenticationRequired`,
/// other users get `AuthorizationDenied`.
pub fn ensure_can_edit(actor: &Actor, post: &Post) -> Result<(), DomainError> {
    actor.require_user()?;
    match edit_access(actor, post) {
        EditAccess::Authorized => Ok(()),
        EditAccess::Denied => Err(DomainError::AuthorizationDenied {
            entity_type: "Post",
            id: post.id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn post_by(author_id: i64) -> Post {
        Post {
            id: 5,
            text: "text".to_string(),
            created_at: Utc::now(),
            author_id,
            group_id: None,
        }
    }

    #[test]
    fn test_author_is_authorized() {
        let actor = Actor::user(1, "auth");
        assert_eq!(edit_access(&actor, &post_by(1)), EditAccess::Authorized);
        assert!(ensure_can_edit(&actor, &post_by(1)).is_ok());
    }

    #[test]
    fn test_other_user_denied() {
        let actor = Actor::user(2, "other");
        assert_eq!(edit_access(&actor, &post_by(1)), EditAccess::Denied);
        assert!(matches!(
            ensure_can_edit(&actor, &post_by(1)),
            Err(DomainError::AuthorizationDenied { id: 5, .. })
        ));
    }

    #[test]
    fn test_anonymous_needs_login() {
        assert_eq!(edit_access(&Actor::Anonymous, &post_by(1)), EditAccess::Denied);
        assert!(matches!(
            ensure_can_edit(&Actor::Anonymous, &post_by(1)),
            Err(DomainError::AuthenticationRequired)
        ));
    }
}
