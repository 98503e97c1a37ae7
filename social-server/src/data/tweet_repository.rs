use crate::domain::{DomainError, LikeTarget, Tweet};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[async_trait]
pub trait TweetRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, content: String) -> Result<Tweet, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Tweet, DomainError>;
    async fn update_content(&self, id: Uuid, content: String) -> Result<Tweet, DomainError>;
    /// Deletes the tweet together with every like that targets it.
    async fn delete_with_likes(&self, id: Uuid) -> Result<(), DomainError>;
}

pub struct PostgresTweetRepository {
    pool: PgPool,
}

impl PostgresTweetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn tweet_from_row(row: &PgRow) -> Result<Tweet, DomainError> {
    Ok(Tweet {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        owner_id: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TweetRepository for PostgresTweetRepository {
    async fn create(&self, owner_id: Uuid, content: String) -> Result<Tweet, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO tweets (id, content, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, content, owner_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&content)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create tweet: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        tweet_from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Tweet, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, content, owner_id, created_at, updated_at
            FROM tweets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => tweet_from_row(&row),
            None => Err(DomainError::TweetNotFound),
        }
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Tweet, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE tweets
            SET content = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, content, owner_id, created_at, updated_at
            "#,
        )
        .bind(&content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => tweet_from_row(&row),
            None => Err(DomainError::TweetNotFound),
        }
    }

    async fn delete_with_likes(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        let likes = sqlx::query("DELETE FROM likes WHERE target_kind = $1 AND target_id = $2")
            .bind(LikeTarget::Tweet.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DomainError::TweetNotFound);
        }

        tx.commit().await?;

        tracing::debug!(
            "Tweet {} deleted along with {} likes",
            id,
            likes.rows_affected()
        );
        Ok(())
    }
}
