//! Authentication utilities library
//!
//! Provides the credential and session-token primitives used by the portal:
//! - Password hashing (Argon2id) with configurable cost
//! - JWT token generation and validation (HS256)
//! - An injectable clock for token issuance and expiry
//!
//! Services define their own user model and roles and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! let issued = auth.issue_token(1, "alice@x.edu", "student").unwrap();
//! let claims = auth.validate_token(&issued.token).unwrap();
//! assert_eq!(claims.id, 1);
//! assert_eq!(claims.role, "student");
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
