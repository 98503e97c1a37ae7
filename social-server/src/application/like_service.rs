use crate::data::comment_repository::CommentRepository;
use crate::data::like_repository::LikeRepository;
use crate::data::tweet_repository::TweetRepository;
use crate::data::video_repository::VideoRepository;
use crate::domain::like::LikeToggleResponse;
use crate::domain::{DomainError, LikeTarget};
use std::sync::Arc;
use uuid::Uuid;

pub struct LikeService {
    like_repo: Arc<dyn LikeRepository>,
    tweet_repo: Arc<dyn TweetRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    video_repo: Arc<dyn VideoRepository>,
}

impl LikeService {
    pub fn new(
        like_repo: Arc<dyn LikeRepository>,
        tweet_repo: Arc<dyn TweetRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        video_repo: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            like_repo,
            tweet_repo,
            comment_repo,
            video_repo,
        }
    }

    /// Likes the target if the user has not liked it yet, otherwise removes the like.
    pub async fn toggle(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<LikeToggleResponse, DomainError> {
        self.ensure_target_exists(target_kind, target_id).await?;

        let is_liked = match self.like_repo.find(target_kind, target_id, user_id).await? {
            Some(like) => {
                self.like_repo.delete(like.id).await?;
                false
            }
            None => {
                self.like_repo.create(target_kind, target_id, user_id).await?;
                true
            }
        };

        tracing::info!(
            "Like toggled: {} {} by {} -> {}",
            target_kind,
            target_id,
            user_id,
            if is_liked { "liked" } else { "unliked" }
        );

        Ok(LikeToggleResponse {
            target_kind,
            target_id,
            is_liked,
        })
    }

    async fn ensure_target_exists(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<(), DomainError> {
        match target_kind {
            LikeTarget::Tweet => self.tweet_repo.find_by_id(target_id).await.map(|_| ()),
            LikeTarget::Comment => self.comment_repo.find_by_id(target_id).await.map(|_| ()),
            LikeTarget::Video => {
                if self.video_repo.exists(target_id).await? {
                    Ok(())
                } else {
                    Err(DomainError::VideoNotFound)
                }
            }
        }
    }
}
