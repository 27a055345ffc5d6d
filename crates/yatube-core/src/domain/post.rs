use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, UserId};
use crate::form::ValidatedPost;

pub type PostId = i64;

/// Number of characters a post shows when displayed as a short label.
pub const POST_SUMMARY_CHARS: usize = 15;

/// Post entity - a text note published by a user, optionally in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub group_id: Option<i64>,
}

impl Post {
    /// First [`POST_SUMMARY_CHARS`] characters of the text.
    pub fn summary(&self) -> String {
        self.text.chars().take(POST_SUMMARY_CHARS).collect()
    }

    /// Whether `user_id` wrote this post.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Apply validated form values. Only `text` and `group_id` change.
    pub fn apply(&mut self, values: ValidatedPost) {
        self.text = values.text;
        self.group_id = values.group_id;
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub group_id: Option<i64>,
}

impl NewPost {
    /// Create a post for `author_id` from validated form values.
    pub fn new(author_id: UserId, values: ValidatedPost) -> Self {
        Self {
            text: values.text,
            created_at: Utc::now(),
            author_id,
            group_id: values.group_id,
        }
    }
}

/// A post together with the records it references, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: Author,
    pub group: Option<Group>,
}

/// Public view of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: UserId,
    pub username: String,
}
