//! HS256 access tokens.
//!
//! A token names the user twice: `sub` carries the numeric id and `username`
//! the login, so handlers can build an actor without a database round trip.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use yatube_core::domain::UserId;
use yatube_core::ports::{AuthError, TokenClaims, TokenService};

const DEV_SECRET: &str = "change-me-in-production";

/// Signing secret, token lifetime and issuer.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "yatube".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);
        if secret == DEV_SECRET {
            warn_dev_secret();
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }

    fn lifetime(&self) -> TimeDelta {
        TimeDelta::hours(self.expiration_hours)
    }
}

fn warn_dev_secret() {
    let production = matches!(
        std::env::var("RUST_ENV").as_deref(),
        Ok("production") | Ok("prod")
    );
    if production {
        tracing::error!("SECURITY: JWT_SECRET is unset in production; tokens use the development secret");
    } else {
        tracing::warn!("Using the development JWT secret. Set JWT_SECRET for real deployments.");
    }
}

/// Wire form of the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    exp: i64,
    iat: i64,
    iss: String,
}

impl Claims {
    fn into_token_claims(self) -> Result<TokenClaims, AuthError> {
        let user_id = self
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken(format!("subject {:?} is not a user id", self.sub)))?;

        Ok(TokenClaims {
            user_id,
            username: self.username,
            exp: self.exp,
        })
    }
}

/// Issues and checks HS256 tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: UserId, username: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: (issued + self.config.lifetime()).timestamp(),
            iat: issued.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidIssuer => AuthError::InvalidToken("unexpected issuer".to_string()),
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        data.claims.into_token_claims()
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.lifetime().num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    fn signed(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_token_carries_id_and_username() {
        let service = JwtTokenService::new(config());

        let token = service.generate_token(42, "leo").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "leo");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_foreign_tokens_are_rejected() {
        let service = JwtTokenService::new(config());
        let other_secret = JwtTokenService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..config()
        });
        let other_issuer = JwtTokenService::new(JwtConfig {
            issuer: "someone-else".to_string(),
            ..config()
        });

        let tokens = [
            "invalid-token".to_string(),
            other_secret.generate_token(1, "auth").unwrap(),
            other_issuer.generate_token(1, "auth").unwrap(),
        ];
        for token in tokens {
            assert!(matches!(
                service.validate_token(&token),
                Err(AuthError::InvalidToken(_))
            ));
        }
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new(config());
        let past = Utc::now().timestamp() - 60;
        let token = signed(
            &Claims {
                sub: "1".to_string(),
                username: "auth".to_string(),
                exp: past,
                iat: past - 3600,
                iss: "test-issuer".to_string(),
            },
            "test-secret-key",
        );

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let service = JwtTokenService::new(config());
        let token = signed(
            &Claims {
                sub: "not-a-number".to_string(),
                username: "auth".to_string(),
                exp: Utc::now().timestamp() + 60,
                iat: Utc::now().timestamp(),
                iss: "test-issuer".to_string(),
            },
            "test-secret-key",
        );

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: 24,
            ..config()
        });

        assert_eq!(service.expiration_seconds(), 86_400);
    }
}
