use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Longest accepted username.
pub const USERNAME_MAX_LEN: usize = 150;

/// User entity - represents a user in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Create a new user with the current timestamp.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Usernames are 1 to 150 characters of letters, digits and `@ . + - _`.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=USERNAME_MAX_LEN).contains(&len)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("auth"));
        assert!(is_valid_username("leo.tolstoy+1@ya"));
        assert!(is_valid_username("Лев"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("slash/name"));
        assert!(!is_valid_username(&"a".repeat(USERNAME_MAX_LEN + 1)));
    }
}
