use crate::domain::{DomainError, Like, LikeTarget};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn find(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, DomainError>;
    /// Idempotent: liking twice returns the existing row.
    async fn create(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<Like, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn like_from_row(row: &PgRow) -> Result<Like, DomainError> {
    let kind: String = row.try_get("target_kind")?;
    Ok(Like {
        id: row.try_get("id")?,
        target_kind: kind.parse()?,
        target_id: row.try_get("target_id")?,
        liked_by: row.try_get("liked_by")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn find(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, target_kind, target_id, liked_by, created_at
            FROM likes
            WHERE target_kind = $1 AND target_id = $2 AND liked_by = $3
            "#,
        )
        .bind(target_kind.as_str())
        .bind(target_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(like_from_row).transpose()
    }

    async fn create(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<Like, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO likes (id, target_kind, target_id, liked_by, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (target_kind, target_id, liked_by) DO UPDATE
            SET liked_by = EXCLUDED.liked_by
            RETURNING id, target_kind, target_id, liked_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(target_kind.as_str())
        .bind(target_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create like: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        like_from_row(&row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
