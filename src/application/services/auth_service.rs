//! Authentication Service
//!
//! Handles registration, email verification, login, and password resets.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::config::JwtSettings;
use crate::domain::events::{publish_best_effort, IndexEvent, MailRequest};
use crate::domain::{DomainEvent, EventPublisher, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;
use crate::shared::validation::normalize_name;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new, unverified user
    async fn register(&self, email: &str, name: &str, password: &str) -> Result<User, AuthError>;

    /// Consume a verification token
    async fn verify_email(&self, token: &str) -> Result<User, AuthError>;

    /// Authenticate with credentials and issue an access token
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Start a password reset. Unknown emails are silently ignored.
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;

    /// Finish a password reset
    async fn reset_password(&self, token: &str, password: &str) -> Result<(), AuthError>;
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Please verify your email before logging in")]
    EmailNotVerified,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Email already exists")]
    EmailExists,

    #[error("Name already exists")]
    NameExists,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::EmailNotVerified
            | AuthError::TokenExpired
            | AuthError::InvalidToken => AppError::Unauthorized(err.to_string()),
            AuthError::InvalidVerificationToken => AppError::BadRequest(err.to_string()),
            AuthError::InvalidResetToken => AppError::validation(err.to_string()),
            AuthError::EmailExists | AuthError::NameExists => AppError::Conflict(err.to_string()),
            AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::Store(e) => e,
        }
    }
}

/// Sign an access token for `user_id`.
pub fn issue_token(user_id: i64, settings: &JwtSettings) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::minutes(settings.token_expiry_minutes)).timestamp(),
        iat: now.timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate an access token and return the user id it was issued for.
pub fn decode_token(token: &str, secret: &str) -> Result<i64, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidToken)
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 256 random bits, hex encoded.
fn random_token() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Reset tokens are stored hashed.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// AuthService implementation
pub struct AuthServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    publisher: Arc<dyn EventPublisher>,
    id_generator: Arc<SnowflakeGenerator>,
    jwt_settings: JwtSettings,
}

impl<U> AuthServiceImpl<U>
where
    U: UserRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        publisher: Arc<dyn EventPublisher>,
        id_generator: Arc<SnowflakeGenerator>,
        jwt_settings: JwtSettings,
    ) -> Self {
        Self {
            user_repo,
            publisher,
            id_generator,
            jwt_settings,
        }
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository + 'static,
{
    #[instrument(skip(self, password))]
    async fn register(&self, email: &str, name: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let name = normalize_name(name)?;

        if self.user_repo.email_exists(&email).await? {
            return Err(AuthError::EmailExists);
        }

        if self.user_repo.name_exists(&name).await? {
            return Err(AuthError::NameExists);
        }

        let password_hash = hash_password(password)?;
        let verification_token = random_token();

        let now = Utc::now();
        let user = User {
            id: self.id_generator.generate(),
            email,
            name,
            password_hash,
            verification_token: Some(verification_token.clone()),
            created_at: now,
            updated_at: now,
            ..User::default()
        };

        let created = self.user_repo.create(&user).await?;
        tracing::info!(user_id = created.id, "User registered");

        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::Mail(MailRequest::Verification {
                email: created.email.clone(),
                name: created.name.clone(),
                token: verification_token,
            }),
        )
        .await;
        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::SearchIndex(IndexEvent::UpsertUser {
                id: created.id,
                name: created.name.clone(),
            }),
        )
        .await;

        Ok(created)
    }

    #[instrument(skip_all)]
    async fn verify_email(&self, token: &str) -> Result<User, AuthError> {
        let mut user = self
            .user_repo
            .find_by_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        user.is_verified = true;
        user.verification_token = None;
        user.updated_at = Utc::now();

        let user = self.user_repo.update(&user).await?;
        tracing::info!(user_id = user.id, "Email verified");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(AuthError::EmailNotVerified);
        }

        issue_token(user.id, &self.jwt_settings)
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let Some(mut user) = self.user_repo.find_by_email(email.trim()).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = random_token();
        let now = Utc::now();
        user.reset_password_token = Some(hash_token(&token));
        user.reset_password_expires_at =
            Some(now + Duration::minutes(self.jwt_settings.reset_token_expiry_minutes));
        user.updated_at = now;

        self.user_repo.update(&user).await?;

        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::Mail(MailRequest::PasswordReset {
                email: user.email,
                token,
            }),
        )
        .await;

        Ok(())
    }

    #[instrument(skip_all)]
    async fn reset_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut user = self
            .user_repo
            .find_by_reset_token_hash(&hash_token(token))
            .await?
            .filter(|u| u.reset_token_valid_at(now))
            .ok_or(AuthError::InvalidResetToken)?;

        user.password_hash = hash_password(password)?;
        user.reset_password_token = None;
        user.reset_password_expires_at = None;
        user.updated_at = now;

        self.user_repo.update(&user).await?;
        tracing::info!(user_id = user.id, "Password reset");
        Ok(())
    }
}
