use crate::domain::{Comment, DomainError, LikeTarget};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Comment, DomainError>;
    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError>;
    /// Deletes the comment together with every like that targets it.
    async fn delete_with_likes(&self, id: Uuid) -> Result<(), DomainError>;
}

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn comment_from_row(row: &PgRow) -> Result<Comment, DomainError> {
    Ok(Comment {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        owner_id: row.try_get("owner_id")?,
        video_id: row.try_get("video_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO comments (id, content, owner_id, video_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, content, owner_id, video_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&content)
        .bind(owner_id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        comment_from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Comment, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, content, owner_id, video_id, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => comment_from_row(&row),
            None => Err(DomainError::CommentNotFound),
        }
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE comments
            SET content = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, content, owner_id, video_id, created_at, updated_at
            "#,
        )
        .bind(&content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => comment_from_row(&row),
            None => Err(DomainError::CommentNotFound),
        }
    }

    async fn delete_with_likes(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        let likes = sqlx::query("DELETE FROM likes WHERE target_kind = $1 AND target_id = $2")
            .bind(LikeTarget::Comment.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DomainError::CommentNotFound);
        }

        tx.commit().await?;

        tracing::debug!(
            "Comment {} deleted along with {} likes",
            id,
            likes.rows_affected()
        );
        Ok(())
    }
}
