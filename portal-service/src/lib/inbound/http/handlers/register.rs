use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PasswordPolicy;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let command = body.try_into_command(&state.password_policy)?;

    let user = state.auth_service.register(command).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        UserResponseData {
            message: Some("Registration successful, awaiting verification".to_string()),
            user: (&user).into(),
        },
    ))
}

/// HTTP request body for self-service registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    password_confirm: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    role: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self, policy: &PasswordPolicy) -> Result<RegisterCommand, UserError> {
        let password = Password::confirmed(self.password, &self.password_confirm, policy)?;
        let email = EmailAddress::new(self.email)?;
        let first_name = PersonName::new(self.first_name)?;
        let last_name = PersonName::new(self.last_name)?;
        let role = self.role.map(|r| r.parse::<Role>()).transpose()?;

        Ok(RegisterCommand {
            email,
            password,
            first_name,
            last_name,
            role,
        })
    }
}
