use crate::data::feed_repository::FeedRepository;
use crate::data::user_repository::UserRepository;
use crate::data::video_repository::VideoRepository;
use crate::domain::feed::{FeedFilter, FeedItem, Page, PageRequest};
use crate::domain::DomainError;
use std::sync::Arc;
use uuid::Uuid;

/// Builds paginated, denormalized content listings.
pub struct FeedService {
    feed_repo: Arc<dyn FeedRepository>,
    user_repo: Arc<dyn UserRepository>,
    video_repo: Arc<dyn VideoRepository>,
}

impl FeedService {
    pub fn new(
        feed_repo: Arc<dyn FeedRepository>,
        user_repo: Arc<dyn UserRepository>,
        video_repo: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            feed_repo,
            user_repo,
            video_repo,
        }
    }

    /// The parent of the filter must exist; an empty result is still a valid page.
    pub async fn assemble(
        &self,
        filter: FeedFilter,
        requester: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<FeedItem>, DomainError> {
        self.ensure_parent_exists(filter).await?;

        let total = self.feed_repo.count(filter).await?;
        let items = match page.offset() {
            Some(offset) if offset < total => {
                self.feed_repo
                    .fetch(filter, requester, page.limit, offset)
                    .await?
            }
            _ => Vec::new(),
        };

        tracing::debug!(
            "Feed {:?} page={} limit={} -> {} of {} items",
            filter,
            page.page,
            page.limit,
            items.len(),
            total
        );

        Ok(Page::new(items, total, page))
    }

    pub async fn user_tweets(
        &self,
        user_id: Uuid,
        requester: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<FeedItem>, DomainError> {
        self.assemble(FeedFilter::TweetsByOwner(user_id), requester, page)
            .await
    }

    pub async fn video_comments(
        &self,
        video_id: Uuid,
        requester: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<FeedItem>, DomainError> {
        self.assemble(FeedFilter::CommentsOnVideo(video_id), requester, page)
            .await
    }

    async fn ensure_parent_exists(&self, filter: FeedFilter) -> Result<(), DomainError> {
        match filter {
            FeedFilter::TweetsByOwner(user_id) => {
                self.user_repo.find_by_id(user_id).await?;
            }
            FeedFilter::CommentsOnVideo(video_id) => {
                if !self.video_repo.exists(video_id).await? {
                    return Err(DomainError::VideoNotFound);
                }
            }
        }
        Ok(())
    }
}
