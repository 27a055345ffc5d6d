//! Argon2 password hashing implementation.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use yatube_core::ports::{AuthError, PasswordService};

/// Argon2id password service producing PHC-format hashes.
///
/// Verification reads the cost from the stored hash, so changing the cost
/// only affects hashes produced afterwards.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Argon2id with the library's recommended cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with an explicit cost: memory in KiB, passes and lanes.
    pub fn with_cost(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Cost from `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS` and `ARGON2_LANES`.
    /// Unset variables keep the default; an invalid combination falls back to
    /// the default cost.
    pub fn from_env() -> Self {
        let read = |key: &str, default: u32| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        let memory_kib = read("ARGON2_MEMORY_KIB", Params::DEFAULT_M_COST);
        let iterations = read("ARGON2_ITERATIONS", Params::DEFAULT_T_COST);
        let lanes = read("ARGON2_LANES", Params::DEFAULT_P_COST);

        match Self::with_cost(memory_kib, iterations, lanes) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid Argon2 cost, using defaults");
                Self::new()
            }
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}
