use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by a session token.
///
/// `id`, `email` and `role` describe the user at issuance time; `iat` and `exp`
/// are Unix timestamps. The role is kept as its wire string so that services can
/// map it onto their own role type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `ttl` starting at `issued_at`.
    pub fn for_user(
        id: i64,
        email: impl Into<String>,
        role: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            id,
            email: email.into(),
            role: role.into(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    /// Expiration as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let now = Utc::now();
        let claims = Claims::for_user(7, "alice@x.edu", "student", now, Duration::hours(24));

        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "alice@x.edu");
        assert_eq!(claims.role, "student");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
    }

    #[test]
    fn test_is_expired() {
        let issued = DateTime::from_timestamp(1000, 0).unwrap();
        let claims = Claims::for_user(1, "a@b.c", "admin", issued, Duration::seconds(100));

        assert!(!claims.is_expired(1099)); // Not expired
        assert!(!claims.is_expired(1100)); // Exactly at expiration
        assert!(claims.is_expired(1101)); // Expired
    }

    #[test]
    fn test_wire_format() {
        let issued = DateTime::from_timestamp(1000, 0).unwrap();
        let claims = Claims::for_user(3, "bob@x.edu", "admin", issued, Duration::seconds(60));
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["email"], "bob@x.edu");
        assert_eq!(value["role"], "admin");
        assert_eq!(value["iat"], 1000);
        assert_eq!(value["exp"], 1060);
    }
}
