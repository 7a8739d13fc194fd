//! Account service: login, registration, profile and password changes
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::lockout::{retry_after_secs, LoginAttemptTracker};
use crate::domain::{
    DomainError, DomainResult, Identity, NewUser, RepositoryProvider, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::InfraError;

/// Issued token plus the account it belongs to
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub role: Option<UserRole>,
}

/// Account created on first start when the user table is empty
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
    attempts: LoginAttemptTracker,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
        attempts: LoginAttemptTracker,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
            attempts,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check credentials for `client` (the caller's address) and issue a token.
    ///
    /// Unknown usernames and wrong passwords fail identically. A locked-out
    /// client is rejected before the credentials are looked at.
    pub async fn login(&self, client: &str, username: &str, password: &str) -> DomainResult<AuthResult> {
        if let Err(remaining) = self.attempts.check(client) {
            warn!(client, "Login attempt while locked out");
            return Err(DomainError::TooManyAttempts {
                retry_after_secs: retry_after_secs(remaining),
            });
        }

        let user = self.repos.users().find_by_username(username).await?;
        let verified = user.filter(|u| {
            verify_password(password, &u.password_hash).unwrap_or_else(|e| {
                warn!(user_id = %u.id, "Stored password hash is unreadable: {}", e);
                false
            })
        });

        let Some(mut user) = verified else {
            if let Some(lock) = self.attempts.record_failure(client) {
                warn!(client, lock_secs = lock.as_secs(), "Too many failed logins, client locked");
            }
            return Err(DomainError::InvalidCredentials);
        };
        self.attempts.record_success(client);

        user.last_login_at = Some(Utc::now());
        let user = self.repos.users().update(user).await?;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        self.issue(user)
    }

    /// Resolve a bearer token to the identity of a stored user.
    pub async fn authenticate(&self, token: &str) -> DomainResult<Identity> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|e| DomainError::Unauthorized(format!("Invalid token: {}", e)))?;

        let user = self
            .repos
            .users()
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User no longer exists".into()))?;

        Ok(user.identity())
    }

    // ── Accounts ────────────────────────────────────────────────

    /// Create an account and issue a token for it.
    pub async fn register(&self, registration: Registration) -> DomainResult<AuthResult> {
        let email = registration.email.to_lowercase();
        if self
            .repos
            .users()
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let user = self
            .create_user(NewUser {
                username: registration.username,
                password_hash: self.hash(&registration.password)?,
                name: registration.name,
                email,
                role: registration.role.unwrap_or_default(),
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        self.issue(user)
    }

    pub async fn profile(&self, identity: &Identity) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", identity.user_id.clone()))
    }

    /// Replace the caller's password after checking the current one.
    pub async fn change_password(
        &self,
        identity: &Identity,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.profile(identity).await?;

        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::invalid(
                "currentPassword",
                "Current password is incorrect",
            ));
        }

        user.password_hash = self.hash(new_password)?;
        user.updated_at = Utc::now();
        self.repos.users().update(user).await?;

        info!(user_id = %identity.user_id, "Password changed");
        Ok(())
    }

    /// Create the configured admin account if no user exists yet.
    /// Returns whether an account was created.
    pub async fn ensure_bootstrap_admin(&self, admin: BootstrapAdmin) -> DomainResult<bool> {
        if self.repos.users().count().await? > 0 {
            return Ok(false);
        }

        let user = self
            .create_user(NewUser {
                username: admin.username,
                password_hash: self.hash(&admin.password)?,
                name: admin.name,
                email: admin.email,
                role: UserRole::Admin,
            })
            .await?;

        info!(username = %user.username, "Default admin account created");
        warn!("Change the default admin password immediately");
        Ok(true)
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn create_user(&self, new: NewUser) -> DomainResult<User> {
        let user = User::new(Uuid::new_v4().to_string(), new, Utc::now());
        self.repos.users().insert(user).await
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.bcrypt_cost).map_err(|e| InfraError::from(e).into())
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token =
            create_token(&user.identity(), &self.jwt_config).map_err(InfraError::from)?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_secs(),
            user,
        })
    }
}
