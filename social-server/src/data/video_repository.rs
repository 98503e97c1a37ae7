use crate::domain::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Videos are owned by another part of the platform; comments and likes only
/// need to know whether one exists.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    async fn exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
