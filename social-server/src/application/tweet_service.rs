use super::guard::ensure_owner;
use crate::data::tweet_repository::TweetRepository;
use crate::domain::content::validate_content;
use crate::domain::tweet::TweetRequest;
use crate::domain::{DomainError, Tweet};
use std::sync::Arc;
use uuid::Uuid;

pub struct TweetService {
    tweet_repo: Arc<dyn TweetRepository>,
}

impl TweetService {
    pub fn new(tweet_repo: Arc<dyn TweetRepository>) -> Self {
        Self { tweet_repo }
    }

    pub async fn create_tweet(&self, owner_id: Uuid, req: TweetRequest) -> Result<Tweet, DomainError> {
        let content = validate_content(req.content.as_deref())?;

        let tweet = self.tweet_repo.create(owner_id, content).await?;

        tracing::info!("Tweet created: id={}, owner_id={}", tweet.id, owner_id);
        Ok(tweet)
    }

    pub async fn get_tweet(&self, id: Uuid) -> Result<Tweet, DomainError> {
        self.tweet_repo.find_by_id(id).await
    }

    pub async fn update_tweet(
        &self,
        id: Uuid,
        user_id: Uuid,
        req: TweetRequest,
    ) -> Result<Tweet, DomainError> {
        let content = validate_content(req.content.as_deref())?;

        let tweet = self.tweet_repo.find_by_id(id).await?;
        ensure_owner(user_id, &tweet)?;

        let updated = self.tweet_repo.update_content(id, content).await?;

        tracing::info!("Tweet updated: id={}, owner_id={}", id, user_id);
        Ok(updated)
    }

    pub async fn delete_tweet(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let tweet = self.tweet_repo.find_by_id(id).await?;
        ensure_owner(user_id, &tweet)?;

        self.tweet_repo.delete_with_likes(id).await?;

        tracing::info!("Tweet deleted: id={}, owner_id={}", id, user_id);
        Ok(())
    }
}
