use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and session tokens.
///
/// Issues and validates signed, time-limited identity tokens. The clock is
/// injectable so that expiry can be exercised deterministically.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    clock: Arc<dyn Clock>,
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Authenticator {
    /// Default token lifetime.
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

    /// Create a new authenticator with default hashing costs, a 24 hour token
    /// lifetime and the system clock.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl: Duration::hours(Self::DEFAULT_TOKEN_TTL_HOURS),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Compare a plaintext password with a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Sign a token for the given identity, expiring `token_ttl` from now.
    ///
    /// # Errors
    /// * `Signing` - Token generation failed
    pub fn issue_token(&self, id: i64, email: &str, role: &str) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_user(id, email, role, self.clock.now(), self.token_ttl);
        let token = self.jwt_handler.encode(&claims)?;
        let (Some(issued_at), Some(expires_at)) = (claims.issued_at(), claims.expires_at()) else {
            return Err(JwtError::Signing("timestamp out of range".to_string()));
        };

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Validate and decode a session token.
    ///
    /// # Errors
    /// * `BadSignature` / `Malformed` - Signature or structure is wrong
    /// * `Expired` - Token expiry lies in the past of the injected clock
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
