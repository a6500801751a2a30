//! Post Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Post, PostRepository};
use crate::shared::error::AppError;

const POST_COLUMNS: &str =
    "id, user_id, content, media_url, likes_count, comments_count, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    user_id: i64,
    content: String,
    media_url: Option<String>,
    likes_count: i32,
    comments_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            media_url: row.media_url,
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Post::from))
    }

    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let sql = format!(
            r#"
            INSERT INTO posts (id, user_id, content, media_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post.id)
            .bind(post.user_id)
            .bind(&post.content)
            .bind(&post.media_url)
            .bind(post.created_at)
            .bind(post.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn update(&self, post: &Post) -> Result<Post, AppError> {
        let sql = format!(
            r#"
            UPDATE posts
            SET content = $2, media_url = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post.id)
            .bind(&post.content)
            .bind(&post.media_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post.id)))?;

        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }

        Ok(())
    }

    async fn feed(&self, before: Option<i64>, limit: i64) -> Result<Vec<Post>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM posts
            WHERE ($1::BIGINT IS NULL OR id < $1)
            ORDER BY id DESC
            LIMIT $2
            "#,
            POST_COLUMNS
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_user(
        &self,
        user_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM posts
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
            POST_COLUMNS
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(user_id)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
