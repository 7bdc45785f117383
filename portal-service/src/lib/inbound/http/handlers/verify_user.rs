use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn verify_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;

    let user = state.user_service.verify_user(&user_id).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "Account verified by administrator");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserResponseData {
            message: Some("User verified".to_string()),
            user: (&user).into(),
        },
    ))
}
