use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use tokio::sync::OnceCell;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthRejection;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

/// Hash a password on the blocking pool so Argon2 cannot stall the runtime.
async fn hash_password(
    authenticator: &Arc<Authenticator>,
    password: Password,
) -> Result<String, UserError> {
    let authenticator = Arc::clone(authenticator);
    tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
        .await
        .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
        .map_err(UserError::from)
}

async fn verify_password(
    authenticator: &Arc<Authenticator>,
    password: String,
    stored_hash: String,
) -> Result<bool, UserError> {
    let authenticator = Arc::clone(authenticator);
    tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &stored_hash))
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?
        .map_err(UserError::from)
}

/// Domain service for register, login and per-request authorization.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    /// Hash compared against when the email is unknown, so both login
    /// rejections cost one Argon2 verification.
    dummy_hash: OnceCell<String>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `authenticator` - Password hashing and token signing
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            dummy_hash: OnceCell::new(),
        }
    }

    async fn dummy_hash(&self) -> Result<String, UserError> {
        self.dummy_hash
            .get_or_try_init(|| async {
                let authenticator = Arc::clone(&self.authenticator);
                tokio::task::spawn_blocking(move || authenticator.hash_password(DUMMY_PASSWORD))
                    .await
                    .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))
                    .and_then(|hashed| hashed.map_err(UserError::from))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = hash_password(&self.authenticator, command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                email: command.email,
                password_hash,
                first_name: command.first_name,
                last_name: command.last_name,
                role: command.role.unwrap_or(Role::Student),
                verified: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "User registered");

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, UserError> {
        let Ok(email) = EmailAddress::new(email.to_string()) else {
            tracing::info!("Login rejected: malformed email");
            return Err(UserError::InvalidCredentials);
        };

        let Some(user) = self.repository.find_by_email(&email).await? else {
            let dummy_hash = self.dummy_hash().await?;
            verify_password(&self.authenticator, password.to_string(), dummy_hash).await?;
            tracing::info!(email = %email, "Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        let matches = verify_password(
            &self.authenticator,
            password.to_string(),
            user.password_hash.clone(),
        )
        .await?;
        if !matches {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        if !user.verified {
            tracing::info!(user_id = %user.id, "Login rejected: account not verified");
            return Err(UserError::NotVerified);
        }

        let issued = self
            .authenticator
            .issue_token(user.id.0, user.email.as_str(), user.role.as_str())?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginOutcome {
            user,
            token: issued.token,
            issued_at: issued.issued_at,
            expires_at: issued.expires_at,
        })
    }

    async fn current_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn authorize(
        &self,
        token: Option<&str>,
        allowed: &[Role],
    ) -> Result<AuthenticatedUser, AuthRejection> {
        let token = token.ok_or(AuthRejection::AuthRequired)?;

        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| AuthRejection::InvalidToken(e.to_string()))?;

        let id = UserId(claims.id);
        let user = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AuthRejection::UserNotFound(id.to_string()))?;

        if !user.verified {
            return Err(AuthRejection::NotVerified);
        }

        if !allowed.is_empty() && !allowed.contains(&user.role) {
            return Err(AuthRejection::InsufficientRole(user.role.to_string()));
        }

        Ok(AuthenticatedUser::from(&user))
    }
}

/// Domain service for administrator account management.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = hash_password(&self.authenticator, command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                email: command.email,
                password_hash,
                first_name: command.first_name,
                last_name: command.last_name,
                role: command.role.unwrap_or(Role::Student),
                verified: true,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created by administrator");

        Ok(user)
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_email) = command.email {
            if new_email != user.email {
                if let Some(other) = self.repository.find_by_email(&new_email).await? {
                    if other.id != user.id {
                        return Err(UserError::EmailAlreadyExists(new_email.to_string()));
                    }
                }
            }
            user.email = new_email;
        }

        if let Some(new_password) = command.password {
            user.password_hash = hash_password(&self.authenticator, new_password).await?;
        }

        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }

        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }

        if let Some(role) = command.role {
            user.role = role;
        }

        if let Some(verified) = command.verified {
            user.verified = verified;
        }

        let updated_user = self.repository.update(user).await?;

        tracing::info!(user_id = %updated_user.id, role = %updated_user.role, verified = updated_user.verified, "User updated");

        Ok(updated_user)
    }

    async fn verify_user(&self, id: &UserId) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        user.verified = true;
        let verified_user = self.repository.update(user).await?;

        tracing::info!(user_id = %verified_user.id, "User verified");

        Ok(verified_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn ensure_admin(
        &self,
        email: EmailAddress,
        password: Password,
    ) -> Result<Option<User>, UserError> {
        if self.repository.find_by_email(&email).await?.is_some() {
            tracing::debug!(email = %email, "Seed administrator already present");
            return Ok(None);
        }

        let password_hash = hash_password(&self.authenticator, password).await?;
        let first_name = PersonName::new("Portal".to_string())?;
        let last_name = PersonName::new("Administrator".to_string())?;

        let admin = self
            .repository
            .create(NewUser {
                email,
                password_hash,
                first_name,
                last_name,
                role: Role::Admin,
                verified: true,
            })
            .await?;

        tracing::info!(user_id = %admin.id, email = %admin.email, "Seed administrator created");

        Ok(Some(admin))
    }
}
