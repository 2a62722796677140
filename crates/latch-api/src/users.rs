// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User directory.
//!
//! [`UserService`] is the seam to whatever stores user records. The crate ships
//! [`InMemoryUserService`], which keeps argon2id password hashes in process
//! memory.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use password_hash::{PasswordHash, SaltString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Identity, Role};

// =============================================================================
// Types
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the identity used for session issuance.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.email.clone(), self.role)
    }
}

/// Registration request.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl NewUser {
    /// Checks the registration fields.
    pub fn validate(&self) -> Result<(), UserError> {
        if self.first_name.trim().is_empty() {
            return Err(UserError::validation("firstName is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(UserError::validation("lastName is required"));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(UserError::validation("email is not a valid address")),
        }
        // Strength rules belong to whoever owns the user store.
        if self.password.is_empty() {
            return Err(UserError::validation("password is required"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// User directory errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No user with the given ID.
    #[error("user not found: {0}")]
    NotFound(String),

    /// Another user already registered this email.
    #[error("email already registered")]
    EmailTaken,

    /// Registration input was rejected.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Storage or hashing failure.
    #[error("user service failure: {0}")]
    Internal(String),
}

impl UserError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

// =============================================================================
// UserService
// =============================================================================

/// Storage and credential checks for user records.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Registers a user.
    async fn create(&self, new_user: NewUser) -> Result<User, UserError>;

    /// Checks credentials and returns the matching identity.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, UserError>;

    /// Looks up a user by ID.
    async fn find_by_id(&self, user_id: &str) -> Result<User, UserError>;

    /// Lists all users, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserError>;
}

// =============================================================================
// InMemoryUserService
// =============================================================================

#[derive(Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Process-local user directory.
#[derive(Clone)]
pub struct InMemoryUserService {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
    admin_emails: Arc<HashSet<String>>,
    hasher: Arc<Argon2<'static>>,
}

impl InMemoryUserService {
    /// Creates an empty directory. Emails in `admin_emails` register as admins.
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            admin_emails: Arc::new(
                admin_emails
                    .into_iter()
                    .map(|e| normalize_email(e.as_ref()))
                    .collect(),
            ),
            hasher: Arc::new(Argon2::default()),
        }
    }

    /// Replaces the argon2id cost parameters.
    pub fn with_argon2_params(mut self, params: Params) -> Self {
        self.hasher = Arc::new(Argon2::new(Algorithm::Argon2id, Version::V0x13, params));
        self
    }

    /// Returns the number of registered users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if no user is registered.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn role_for(&self, email: &str) -> Role {
        if self.admin_emails.contains(email) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl std::fmt::Debug for InMemoryUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUserService")
            .field("users", &self.len())
            .field("admin_emails", &self.admin_emails.len())
            .finish()
    }
}

#[async_trait]
impl UserService for InMemoryUserService {
    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        new_user.validate()?;
        let key = normalize_email(&new_user.email);
        if self.users.read().contains_key(&key) {
            return Err(UserError::EmailTaken);
        }

        let hasher = self.hasher.clone();
        let password = new_user.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&hasher, &password))
            .await
            .map_err(|e| UserError::internal(e.to_string()))??;

        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            email: new_user.email.trim().to_string(),
            role: self.role_for(&key),
            created_at: Utc::now(),
        };

        let mut users = self.users.write();
        if users.contains_key(&key) {
            return Err(UserError::EmailTaken);
        }
        users.insert(
            key,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );
        drop(users);

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, UserError> {
        let stored = self
            .users
            .read()
            .get(&normalize_email(email))
            .cloned()
            .ok_or(UserError::InvalidCredentials)?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let phc = stored.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&hasher, &password, &phc))
            .await
            .map_err(|e| UserError::internal(e.to_string()))?;

        if verified {
            Ok(stored.user.identity())
        } else {
            Err(UserError::InvalidCredentials)
        }
    }

    async fn find_by_id(&self, user_id: &str) -> Result<User, UserError> {
        self.users
            .read()
            .values()
            .find(|s| s.user.id == user_id)
            .map(|s| s.user.clone())
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    async fn list(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().values().map(|s| s.user.clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(users)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(hasher: &Argon2<'_>, password: &str) -> Result<String, UserError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| UserError::internal(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| UserError::internal(e.to_string()))?;
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::internal(e.to_string()))
}

fn verify_password(hasher: &Argon2<'_>, password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> InMemoryUserService {
        InMemoryUserService::new(["admin@example.com"])
            .with_argon2_params(Params::new(8, 1, 1, None).unwrap())
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let service = service();
        let user = service.create(new_user("ada@example.com")).await.unwrap();
        assert_eq!(user.role, Role::User);

        let identity = service
            .authenticate("ada@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::User);
    }

    #[tokio::test]
    async fn test_admin_email_gets_admin_role() {
        let service = service();
        let user = service.create(new_user("Admin@Example.com")).await.unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let service = service();
        service.create(new_user("ada@example.com")).await.unwrap();

        let result = service.create(new_user("ADA@example.com")).await;
        assert_eq!(result.unwrap_err(), UserError::EmailTaken);
        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let service = service();
        service.create(new_user("ada@example.com")).await.unwrap();

        let wrong_password = service.authenticate("ada@example.com", "nope").await;
        let unknown_email = service.authenticate("bob@example.com", "correct horse").await;
        assert_eq!(wrong_password.unwrap_err(), UserError::InvalidCredentials);
        assert_eq!(unknown_email.unwrap_err(), UserError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_find_and_list() {
        let service = service();
        let ada = service.create(new_user("ada@example.com")).await.unwrap();
        service.create(new_user("bob@example.com")).await.unwrap();

        assert_eq!(service.find_by_id(&ada.id).await.unwrap(), ada);
        assert!(matches!(
            service.find_by_id("missing").await,
            Err(UserError::NotFound(_))
        ));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_validation() {
        let service = service();
        let mut user = new_user("not-an-email");
        assert!(matches!(
            service.create(user.clone()).await,
            Err(UserError::Validation(_))
        ));

        user.email = "ada@example.com".to_string();
        user.password = String::new();
        assert!(matches!(
            service.create(user).await,
            Err(UserError::Validation(_))
        ));
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn test_short_password_accepted() {
        let service = service();
        let mut user = new_user("test@example.com");
        user.password = "123456".to_string();

        service.create(user).await.unwrap();
        assert!(service.authenticate("test@example.com", "123456").await.is_ok());
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hasher = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(8, 1, 1, None).unwrap(),
        );
        let phc = hash_password(&hasher, "secret password").unwrap();

        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password(&hasher, "secret password", &phc));
        assert!(!verify_password(&hasher, "other password", &phc));
        assert!(!verify_password(&hasher, "secret password", "not-a-phc"));
    }

    #[test]
    fn test_new_user_debug_hides_password() {
        let debug = format!("{:?}", new_user("ada@example.com"));
        assert!(!debug.contains("correct horse"));
    }
}
