use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct Store {
    users: BTreeMap<UserId, User>,
    last_id: i64,
}

impl Store {
    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| &u.email == email && Some(u.id) != except)
    }
}

/// Process-local credential store.
///
/// Uniqueness checks and writes happen under one lock, so concurrent inserts
/// of the same email resolve to exactly one success. Identifiers are never
/// reused, even after deletion.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, UserError> {
        self.store
            .lock()
            .map_err(|e| UserError::DatabaseError(format!("In-memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut store = self.lock()?;

        if store.email_taken(&user.email, None) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        store.last_id += 1;
        let created = User {
            id: UserId(store.last_id),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            verified: user.verified,
            created_at: Utc::now(),
        };
        store.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut store = self.lock()?;

        if !store.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if store.email_taken(&user.email, Some(user.id)) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        store.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.lock()?
            .users
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
