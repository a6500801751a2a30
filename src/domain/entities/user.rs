//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - name: VARCHAR(50) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - photo_url: TEXT NULL
/// - bio: TEXT NULL
/// - is_verified: BOOLEAN NOT NULL DEFAULT FALSE
/// - verification_token: VARCHAR(255) NULL
/// - reset_password_token: VARCHAR(255) NULL (SHA-256 hex of the emailed token)
/// - reset_password_expires_at: TIMESTAMPTZ NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,

    #[serde(skip_serializing)]
    pub verification_token: Option<String>,

    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,

    #[serde(skip_serializing)]
    pub reset_password_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether a stored reset token is still usable at `now`.
    pub fn reset_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.reset_password_token.is_some()
            && self
                .reset_password_expires_at
                .map(|expires| expires > now)
                .unwrap_or(false)
    }

    /// Public projection of this user.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            email: String::new(),
            name: String::new(),
            password_hash: String::new(),
            photo_url: None,
            bio: None,
            is_verified: false,
            verification_token: None,
            reset_password_token: None,
            reset_password_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The slice of a user shown next to content they authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub photo_url: Option<String>,
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by their email address (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Find a user by their exact display name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError>;

    /// Find the unverified user holding this verification token.
    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AppError>;

    /// Find the user whose stored reset token hash matches.
    async fn find_by_reset_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Load summaries for a batch of ids. Unknown ids are skipped.
    async fn find_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, AppError>;

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Persist every mutable column of an existing user.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Check if a display name is already taken.
    async fn name_exists(&self, name: &str) -> Result<bool, AppError>;

    /// Case-insensitive substring search over names.
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<UserSummary>, AppError>;
}
