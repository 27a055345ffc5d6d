use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::form::{ValidationCode, ValidationErrors};

pub type GroupId = i64;

/// Group entity - a named category posts can be published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A group that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    /// Create a group, rejecting slugs that are not URL-safe.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let slug = slug.into();
        if !is_valid_slug(&slug) {
            return Err(DomainError::Validation(ValidationErrors::single(
                "slug",
                ValidationCode::InvalidSlug,
            )));
        }

        Ok(Self {
            title: title.into(),
            slug,
            description: description.into(),
        })
    }
}

/// Lowercase ASCII letters, digits, hyphens and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
