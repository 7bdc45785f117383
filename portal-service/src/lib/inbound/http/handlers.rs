use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::user::errors::AuthRejection;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod me;
pub mod register;
pub mod update_user;
pub mod verify_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";
pub const ACCOUNT_NOT_VERIFIED: &str = "Account not verified";
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiErrorData { message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("Email already registered".to_string())
            }
            UserError::InvalidCredentials => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            UserError::NotVerified => ApiError::Forbidden(ACCOUNT_NOT_VERIFIED.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidName(_)
            | UserError::InvalidRole(_)
            | UserError::InvalidPassword(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

/// Malformed or mistyped request bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::AuthRequired => {
                ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string())
            }
            AuthRejection::InvalidToken(_) | AuthRejection::UserNotFound(_) => {
                tracing::warn!(reason = %rejection, "Request rejected");
                ApiError::Unauthorized(AUTHENTICATION_FAILED.to_string())
            }
            AuthRejection::NotVerified => ApiError::Forbidden(ACCOUNT_NOT_VERIFIED.to_string()),
            AuthRejection::InsufficientRole(_) => {
                tracing::warn!(reason = %rejection, "Request rejected");
                ApiError::Forbidden(INSUFFICIENT_PERMISSIONS.to_string())
            }
            AuthRejection::Internal(msg) => ApiError::InternalServerError(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            role: user.role,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// Response body for endpoints that return a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserData,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            message: None,
            user: user.into(),
        }
    }
}

/// Response body carrying only a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::PasswordPolicyError;

    #[test]
    fn test_user_errors_map_to_statuses() {
        let cases = [
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UserError::NotVerified, StatusCode::FORBIDDEN),
            (
                UserError::EmailAlreadyExists("a@x.edu".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                UserError::InvalidPassword(PasswordPolicyError::Mismatch),
                StatusCode::BAD_REQUEST,
            ),
            (UserError::NotFound("1".to_string()), StatusCode::NOT_FOUND),
            (
                UserError::DatabaseError("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_rejections_do_not_leak_reason() {
        let expired = ApiError::from(AuthRejection::InvalidToken("ExpiredSignature".to_string()));
        let deleted = ApiError::from(AuthRejection::UserNotFound("42".to_string()));

        assert_eq!(expired, deleted);
        assert_eq!(
            ApiError::from(AuthRejection::AuthRequired),
            ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string())
        );
        assert_eq!(
            ApiError::from(AuthRejection::InsufficientRole("student".to_string())),
            ApiError::Forbidden(INSUFFICIENT_PERMISSIONS.to_string())
        );
    }

    #[test]
    fn test_user_data_omits_password_hash() {
        let user = User {
            id: crate::user::models::UserId(1),
            email: crate::user::models::EmailAddress::new("alice@x.edu".to_string()).unwrap(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: crate::user::models::PersonName::new("Alice".to_string()).unwrap(),
            last_name: crate::user::models::PersonName::new("Liddell".to_string()).unwrap(),
            role: Role::Student,
            verified: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserData::from(&user)).unwrap();
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["role"], "student");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
