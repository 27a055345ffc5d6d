//! Post form validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::GroupId;
use crate::error::DomainError;
use crate::ports::GroupRepository;

/// Raw post form values as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<GroupId>,
}

/// Form values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub text: String,
    pub group_id: Option<GroupId>,
}

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    EmptyText,
    UnknownGroup,
    InvalidSlug,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyText => "EMPTY_TEXT",
            Self::UnknownGroup => "UNKNOWN_GROUP",
            Self::InvalidSlug => "INVALID_SLUG",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::EmptyText => "This field is required.",
            Self::UnknownGroup => "Select a valid choice. That choice is not one of the available choices.",
            Self::InvalidSlug => "Enter a valid slug of lowercase letters, numbers, underscores or hyphens.",
        }
    }
}

/// A rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: ValidationCode,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, code: ValidationCode) -> Self {
        Self {
            field,
            code,
            message: code.message(),
        }
    }
}

/// All field errors of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &'static str, code: ValidationCode) -> Self {
        Self(vec![FieldError::new(field, code)])
    }

    pub fn push(&mut self, field: &'static str, code: ValidationCode) {
        self.0.push(FieldError::new(field, code));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, code: ValidationCode) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.code.as_str()))
            .collect();
        f.write_str(&codes.join(", "))
    }
}

/// Validate a post submission.
///
/// The text is trimmed and must not end up empty; a group, when given, must
/// exist. Every failing field is reported. Author and creation time are never
/// part of the input.
pub async fn validate_post(
    input: PostInput,
    groups: &dyn GroupRepository,
) -> Result<ValidatedPost, DomainError> {
    let mut errors = ValidationErrors::default();

    let text = input.text.trim().to_string();
    if text.is_empty() {
        errors.push("text", ValidationCode::EmptyText);
    }

    if let Some(group_id) = input.group {
        if groups.find_by_id(group_id).await?.is_none() {
            errors.push("group", ValidationCode::UnknownGroup);
        }
    }

    if !errors.is_empty() {
        return Err(DomainError::Validation(errors));
    }

    Ok(ValidatedPost {
        text,
        group_id: input.group,
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::{Group, NewGroup};
    use crate::error::RepoError;
    use crate::ports::BaseRepository;

    struct OneGroup;

    fn the_group() -> Group {
        Group {
            id: 1,
            title: "Тестовая группа".to_string(),
            slug: "test-slug".to_string(),
            description: String::new(),
        }
    }

    #[async_trait]
    impl BaseRepository<Group, NewGroup, GroupId> for OneGroup {
        async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, RepoError> {
            Ok((id == 1).then(the_group))
        }

        async fn insert(&self, _new: NewGroup) -> Result<Group, RepoError> {
            Err(RepoError::Constraint("read-only".to_string()))
        }

        async fn update(&self, entity: Group) -> Result<Group, RepoError> {
            Ok(entity)
        }
    }

    #[async_trait]
    impl GroupRepository for OneGroup {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
            Ok((slug == "test-slug").then(the_group))
        }

        async fn list(&self) -> Result<Vec<Group>, RepoError> {
            Ok(vec![the_group()])
        }
    }

    fn input(text: &str, group: Option<GroupId>) -> PostInput {
        PostInput {
            text: text.to_string(),
            group,
        }
    }

    fn codes(err: DomainError) -> ValidationErrors {
        match err {
            DomainError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_valid_without_group() {
        let values = validate_post(input("Тестовый текст", None), &OneGroup)
            .await
            .unwrap();
        assert_eq!(values.text, "Тестовый текст");
        assert_eq!(values.group_id, None);
    }

    #[tokio::test]
    async fn test_valid_with_group_and_trims() {
        let values = validate_post(input("  hello \n", Some(1)), &OneGroup)
            .await
            .unwrap();
        assert_eq!(values.text, "hello");
        assert_eq!(values.group_id, Some(1));
    }

    #[tokio::test]
    async fn test_empty_and_blank_text_rejected() {
        for text in ["", "   ", "\n\t"] {
            let err = validate_post(input(text, None), &OneGroup).await.unwrap_err();
            assert!(codes(err).has(ValidationCode::EmptyText));
        }
    }

    #[tokio::test]
    async fn test_unknown_group_rejected() {
        let err = validate_post(input("text", Some(42)), &OneGroup)
            .await
            .unwrap_err();
        let errors = codes(err);
        assert!(errors.has(ValidationCode::UnknownGroup));
        assert!(!errors.has(ValidationCode::EmptyText));
    }

    #[tokio::test]
    async fn test_reports_every_field() {
        let err = validate_post(input(" ", Some(42)), &OneGroup)
            .await
            .unwrap_err();
        let errors = codes(err);
        assert_eq!(errors.iter().count(), 2);
        assert_eq!(errors.to_string(), "text: EMPTY_TEXT, group: UNKNOWN_GROUP");
    }
}
