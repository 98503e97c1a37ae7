use super::guard::ensure_owner;
use crate::data::comment_repository::CommentRepository;
use crate::data::video_repository::VideoRepository;
use crate::domain::comment::CommentRequest;
use crate::domain::content::validate_content;
use crate::domain::{Comment, DomainError};
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    video_repo: Arc<dyn VideoRepository>,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        video_repo: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
        }
    }

    pub async fn create_comment(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let content = validate_content(req.content.as_deref())?;

        if !self.video_repo.exists(video_id).await? {
            return Err(DomainError::VideoNotFound);
        }

        let comment = self.comment_repo.create(owner_id, video_id, content).await?;

        tracing::info!(
            "Comment created: id={}, video_id={}, owner_id={}",
            comment.id,
            video_id,
            owner_id
        );
        Ok(comment)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.comment_repo.find_by_id(id).await
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        user_id: Uuid,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let content = validate_content(req.content.as_deref())?;

        let comment = self.comment_repo.find_by_id(id).await?;
        ensure_owner(user_id, &comment)?;

        let updated = self.comment_repo.update_content(id, content).await?;

        tracing::info!("Comment updated: id={}, owner_id={}", id, user_id);
        Ok(updated)
    }

    pub async fn delete_comment(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        let comment = self.comment_repo.find_by_id(id).await?;
        ensure_owner(user_id, &comment)?;

        self.comment_repo.delete_with_likes(id).await?;

        tracing::info!("Comment deleted: id={}, owner_id={}", id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::LikeTarget;

    fn request(content: &str) -> CommentRequest {
        CommentRequest {
            content: Some(content.to_string()),
        }
    }

    #[actix_rt::test]
    async fn comment_needs_existing_video() {
        let store = Arc::new(InMemoryStore::new());
        let service = CommentService::new(store.clone(), store.clone());
        let alice = store.add_user("alice");

        let err = service
            .create_comment(alice.id, Uuid::new_v4(), request("first!"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::VideoNotFound));
    }

    #[actix_rt::test]
    async fn stranger_cannot_edit_comment() {
        let store = Arc::new(InMemoryStore::new());
        let service = CommentService::new(store.clone(), store.clone());
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let video = store.add_video();

        let comment = service
            .create_comment(bob.id, video, request("by bob"))
            .await
            .unwrap();

        let err = service
            .update_comment(comment.id, alice.id, request("by alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
        assert_eq!(
            service.get_comment(comment.id).await.unwrap().content,
            "by bob"
        );
    }

    #[actix_rt::test]
    async fn owner_deletes_comment_with_all_likes() {
        let store = Arc::new(InMemoryStore::new());
        let service = CommentService::new(store.clone(), store.clone());
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let video = store.add_video();
        let comment = service
            .create_comment(alice.id, video, request("hello"))
            .await
            .unwrap();
        store.add_like(LikeTarget::Comment, comment.id, bob.id);

        service.delete_comment(comment.id, alice.id).await.unwrap();

        assert!(matches!(
            service.get_comment(comment.id).await,
            Err(DomainError::CommentNotFound)
        ));
        assert_eq!(store.like_count(LikeTarget::Comment, comment.id), 0);
    }

    #[actix_rt::test]
    async fn update_with_blank_content_is_rejected_before_lookup() {
        let store = Arc::new(InMemoryStore::new());
        let service = CommentService::new(store.clone(), store.clone());

        let err = service
            .update_comment(Uuid::new_v4(), Uuid::new_v4(), request(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
