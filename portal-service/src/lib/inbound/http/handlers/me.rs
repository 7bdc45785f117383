use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use super::AUTHENTICATION_FAILED;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .auth_service
        .current_user(&identity.id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => ApiError::Unauthorized(AUTHENTICATION_FAILED.to_string()),
            _ => ApiError::from(e),
        })
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
