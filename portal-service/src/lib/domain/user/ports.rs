use async_trait::async_trait;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthRejection;
use crate::user::errors::UserError;

/// Port for the authentication flow and the per-request authorization check.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new, unverified account.
    ///
    /// # Arguments
    /// * `command` - Validated command; the password confirmation was already checked
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered (case-insensitive)
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Check credentials and issue a session token.
    ///
    /// # Arguments
    /// * `email` - Raw login identifier as submitted
    /// * `password` - Plaintext password as submitted
    ///
    /// # Returns
    /// The user together with a signed token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `NotVerified` - Credentials are correct but the account awaits verification
    /// * `Password` / `Token` - Hashing or signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, UserError>;

    /// Re-read the live record of an authenticated user.
    ///
    /// # Errors
    /// * `NotFound` - User was deleted after the token was issued
    /// * `DatabaseError` - Database operation failed
    async fn current_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Resolve a presented token to an identity allowed on a route.
    ///
    /// # Arguments
    /// * `token` - Token carried by the request, if any
    /// * `allowed` - Roles admitted by the route; empty admits any verified user
    ///
    /// # Returns
    /// Identity built from the freshly fetched user record
    ///
    /// # Errors
    /// * `AuthRequired` - No token presented
    /// * `InvalidToken` - Bad signature, malformed or expired token
    /// * `UserNotFound` - Token subject no longer exists
    /// * `NotVerified` - Account is not (or no longer) verified
    /// * `InsufficientRole` - Role is not in `allowed`
    /// * `Internal` - Store lookup failed
    async fn authorize(
        &self,
        token: Option<&str>,
        allowed: &[Role],
    ) -> Result<AuthenticatedUser, AuthRejection>;
}

/// Port for administrator-only account management.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// List every account, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Create an account on behalf of an administrator. The account is
    /// created already verified.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another account
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Mark an account as verified so it can log in.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn verify_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Hard-delete an account.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Create a verified administrator unless the email is already taken.
    ///
    /// # Returns
    /// The created administrator, or `None` when the account already existed
    async fn ensure_admin(
        &self,
        email: EmailAddress,
        password: Password,
    ) -> Result<Option<User>, UserError>;
}

/// Persistence operations for the user aggregate.
///
/// Implementations must enforce email uniqueness themselves; the services'
/// existence checks are only a pre-check.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and assign its identifier.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all users ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Overwrite the mutable fields of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another account
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
