use crate::domain::feed::{AuthorSummary, FeedFilter, FeedItem};
use crate::domain::{DomainError, LikeTarget};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Read side of the content tables: counts and denormalized pages.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    async fn count(&self, filter: FeedFilter) -> Result<i64, DomainError>;
    /// Newest first. `requester` drives `is_liked`; `None` yields `false` everywhere.
    async fn fetch(
        &self,
        filter: FeedFilter,
        requester: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>, DomainError>;
}

pub struct PostgresFeedRepository {
    pool: PgPool,
}

impl PostgresFeedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct FeedSource {
    table: &'static str,
    column: &'static str,
    kind: LikeTarget,
    key: Uuid,
}

impl From<FeedFilter> for FeedSource {
    fn from(filter: FeedFilter) -> Self {
        match filter {
            FeedFilter::TweetsByOwner(owner_id) => Self {
                table: "tweets",
                column: "owner_id",
                kind: LikeTarget::Tweet,
                key: owner_id,
            },
            FeedFilter::CommentsOnVideo(video_id) => Self {
                table: "comments",
                column: "video_id",
                kind: LikeTarget::Comment,
                key: video_id,
            },
        }
    }
}

fn item_from_row(row: &PgRow) -> Result<FeedItem, DomainError> {
    Ok(FeedItem {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        owner: AuthorSummary {
            id: row.try_get("owner_id")?,
            username: row.try_get("username")?,
            full_name: row.try_get("full_name")?,
            avatar: row.try_get("avatar")?,
        },
        likes_count: row.try_get("likes_count")?,
        is_liked: row.try_get("is_liked")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl FeedRepository for PostgresFeedRepository {
    async fn count(&self, filter: FeedFilter) -> Result<i64, DomainError> {
        let source = FeedSource::from(filter);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            source.table, source.column
        ))
        .bind(source.key)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn fetch(
        &self,
        filter: FeedFilter,
        requester: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>, DomainError> {
        let source = FeedSource::from(filter);

        let rows = sqlx::query(&format!(
            r#"
            SELECT
                c.id,
                c.content,
                c.created_at,
                u.id AS owner_id,
                u.username,
                u.full_name,
                u.avatar,
                (
                    SELECT COUNT(*) FROM likes l
                    WHERE l.target_kind = $2 AND l.target_id = c.id
                ) AS likes_count,
                EXISTS(
                    SELECT 1 FROM likes l
                    WHERE l.target_kind = $2 AND l.target_id = c.id AND l.liked_by = $3
                ) AS is_liked
            FROM {table} c
            JOIN users u ON u.id = c.owner_id
            WHERE c.{column} = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $4 OFFSET $5
            "#,
            table = source.table,
            column = source.column,
        ))
        .bind(source.key)
        .bind(source.kind.as_str())
        .bind(requester)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }
}
