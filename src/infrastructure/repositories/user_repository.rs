//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{User, UserRepository, UserSummary};
use crate::shared::error::AppError;

const USER_COLUMNS: &str = "id, email, name, password_hash, photo_url, bio, is_verified, \
     verification_token, reset_password_token, reset_password_expires_at, created_at, updated_at";

/// Database row representation of the users table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    photo_url: Option<String>,
    bio: Option<String>,
    is_verified: bool,
    verification_token: Option<String>,
    reset_password_token: Option<String>,
    reset_password_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            photo_url: self.photo_url,
            bio: self.bio,
            is_verified: self.is_verified,
            verification_token: self.verification_token,
            reset_password_token: self.reset_password_token,
            reset_password_expires_at: self.reset_password_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    photo_url: Option<String>,
}

impl From<SummaryRow> for UserSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            photo_url: row.photo_url,
        }
    }
}

/// Map unique violations on users to a conflict.
fn map_unique(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("User with this email or name already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_where(&self, predicate: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, predicate);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one_where("LOWER(email) = LOWER($1)", email).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        self.find_one_where("name = $1", name).await
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AppError> {
        self.find_one_where("verification_token = $1", token).await
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        self.find_one_where("reset_password_token = $1", token_hash)
            .await
    }

    async fn find_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT id, name, photo_url FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, photo_url, bio, is_verified,
                               verification_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.photo_url)
            .bind(&user.bio)
            .bind(user.is_verified)
            .bind(&user.verification_token)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique)?;

        Ok(row.into_user())
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = $2,
                password_hash = $3,
                photo_url = $4,
                bio = $5,
                is_verified = $6,
                verification_token = $7,
                reset_password_token = $8,
                reset_password_expires_at = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.photo_url)
            .bind(&user.bio)
            .bind(user.is_verified)
            .bind(&user.verification_token)
            .bind(&user.reset_password_token)
            .bind(user.reset_password_expires_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique)?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))?;

        Ok(row.into_user())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<UserSummary>, AppError> {
        let escaped = query
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, name, photo_url
            FROM users
            WHERE name ILIKE $1
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}
