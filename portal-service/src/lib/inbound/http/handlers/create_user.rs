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
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PasswordPolicy;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedUser>,
    WithRejection(Json(body), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let command = body.try_into_command(&state.password_policy)?;

    let user = state.user_service.create_user(command).await?;

    tracing::info!(admin_id = %admin.id, user_id = %user.id, "Account created by administrator");

    Ok(ApiSuccess::new(StatusCode::CREATED, (&user).into()))
}

/// HTTP request body for creating a user as an administrator (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    role: Option<String>,
}

impl CreateUserRequest {
    fn try_into_command(self, policy: &PasswordPolicy) -> Result<CreateUserCommand, UserError> {
        Ok(CreateUserCommand {
            email: EmailAddress::new(self.email)?,
            password: Password::new(self.password, policy)?,
            first_name: PersonName::new(self.first_name)?,
            last_name: PersonName::new(self.last_name)?,
            role: self.role.map(|r| r.parse::<Role>()).transpose()?,
        })
    }
}
