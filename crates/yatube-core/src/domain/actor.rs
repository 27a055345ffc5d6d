use super::UserId;
use crate::error::DomainError;

/// The identity a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User { id: UserId, username: String },
}

impl Actor {
    pub fn user(id: UserId, username: impl Into<String>) -> Self {
        Self::User {
            id,
            username: username.into(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User { id, .. } => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// The acting user's id, or `AuthenticationRequired` for anonymous actors.
    pub fn require_user(&self) -> Result<UserId, DomainError> {
        self.user_id().ok_or(DomainError::AuthenticationRequired)
    }
}
