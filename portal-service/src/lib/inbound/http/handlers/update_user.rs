use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PasswordPolicy;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for updating a user (raw JSON)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub verified: Option<bool>,
}

impl UpdateUserRequest {
    fn try_into_command(self, policy: &PasswordPolicy) -> Result<UpdateUserCommand, UserError> {
        Ok(UpdateUserCommand {
            email: self.email.map(EmailAddress::new).transpose()?,
            password: self
                .password
                .map(|p| Password::new(p, policy))
                .transpose()?,
            first_name: self.first_name.map(PersonName::new).transpose()?,
            last_name: self.last_name.map(PersonName::new).transpose()?,
            role: self.role.map(|r| r.parse::<Role>()).transpose()?,
            verified: self.verified,
        })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let command = req.try_into_command(&state.password_policy)?;

    let user = state.user_service.update_user(&user_id, command).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "Account updated by administrator");

    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}
