//! Like Repository Implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{LikeRepository, LikeToggle};
use crate::shared::error::AppError;

/// PostgreSQL like repository implementation.
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let (liked, delta) = if removed > 0 {
            (false, -1)
        } else {
            let inserted = sqlx::query(
                r#"
                INSERT INTO likes (user_id, post_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            // Lost a race against an identical insert: liked, count untouched.
            (true, if inserted > 0 { 1 } else { 0 })
        };

        let likes_count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE posts
            SET likes_count = GREATEST(likes_count + $2, 0)
            WHERE id = $1
            RETURNING likes_count
            "#,
        )
        .bind(post_id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;

        tx.commit().await?;

        Ok(LikeToggle { liked, likes_count })
    }

    async fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn liked_among(&self, user_id: i64, post_ids: &[i64]) -> Result<Vec<i64>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT post_id FROM likes WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn likers(&self, post_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM likes WHERE post_id = $1 ORDER BY created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
