//! In-memory implementation of every repository, used by service and handler tests.

use super::comment_repository::CommentRepository;
use super::feed_repository::FeedRepository;
use super::like_repository::LikeRepository;
use super::tweet_repository::TweetRepository;
use super::user_repository::UserRepository;
use super::video_repository::VideoRepository;
use crate::domain::feed::{AuthorSummary, FeedFilter, FeedItem};
use crate::domain::user::NewUser;
use crate::domain::{Comment, DomainError, Like, LikeTarget, Tweet, User};
use crate::infrastructure::media::{check_image, MediaStore, MediaUpload};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    tweets: Vec<Tweet>,
    comments: Vec<Comment>,
    videos: HashSet<Uuid>,
    likes: Vec<Like>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    // Strictly increasing so "newest first" is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user directly, with a placeholder password hash.
    pub fn add_user(&self, username: &str) -> User {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: username.to_uppercase(),
            avatar: format!("/uploads/{}.png", username),
            cover_image: String::new(),
            password_hash: "not-a-real-hash".to_string(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        user
    }

    pub fn add_video(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().videos.insert(id);
        id
    }

    pub fn add_like(&self, target_kind: LikeTarget, target_id: Uuid, liked_by: Uuid) {
        let mut state = self.state.lock().unwrap();
        let created_at = state.tick();
        state.likes.push(Like {
            id: Uuid::new_v4(),
            target_kind,
            target_id,
            liked_by,
            created_at,
        });
    }

    pub fn like_count(&self, target_kind: LikeTarget, target_id: Uuid) -> usize {
        self.state
            .lock()
            .unwrap()
            .likes
            .iter()
            .filter(|l| l.target_kind == target_kind && l.target_id == target_id)
            .count()
    }

    pub fn stored_refresh_token(&self, user_id: Uuid) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .and_then(|u| u.refresh_token.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DomainError::UserAlreadyExists);
        }

        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar: user.avatar,
            cover_image: user.cover_image,
            password_hash: user.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn find_by_login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, DomainError> {
        let username = username.map(str::to_lowercase);
        let email = email.map(str::to_lowercase);
        let state = self.state.lock().unwrap();
        let by_username = state
            .users
            .iter()
            .find(|u| username.as_deref() == Some(u.username.as_str()));
        by_username
            .or_else(|| {
                state
                    .users
                    .iter()
                    .find(|u| email.as_deref() == Some(u.email.as_str()))
            })
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn exists(&self, username: &str, email: &str) -> Result<bool, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound)?;
        user.refresh_token = token.map(String::from);
        user.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl TweetRepository for InMemoryStore {
    async fn create(&self, owner_id: Uuid, content: String) -> Result<Tweet, DomainError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let tweet = Tweet {
            id: Uuid::new_v4(),
            content,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        state.tweets.push(tweet.clone());
        Ok(tweet)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Tweet, DomainError> {
        self.state
            .lock()
            .unwrap()
            .tweets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(DomainError::TweetNotFound)
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Tweet, DomainError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let tweet = state
            .tweets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::TweetNotFound)?;
        tweet.content = content;
        tweet.updated_at = now;
        Ok(tweet.clone())
    }

    async fn delete_with_likes(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.tweets.len();
        state.tweets.retain(|t| t.id != id);
        if state.tweets.len() == before {
            return Err(DomainError::TweetNotFound);
        }
        state
            .likes
            .retain(|l| !(l.target_kind == LikeTarget::Tweet && l.target_id == id));
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let comment = Comment {
            id: Uuid::new_v4(),
            content,
            owner_id,
            video_id,
            created_at: now,
            updated_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(DomainError::CommentNotFound)
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::CommentNotFound)?;
        comment.content = content;
        comment.updated_at = now;
        Ok(comment.clone())
    }

    async fn delete_with_likes(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(DomainError::CommentNotFound);
        }
        state
            .likes
            .retain(|l| !(l.target_kind == LikeTarget::Comment && l.target_id == id));
        Ok(())
    }
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn exists(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.state.lock().unwrap().videos.contains(&id))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn find(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .likes
            .iter()
            .find(|l| l.target_kind == target_kind && l.target_id == target_id && l.liked_by == user_id)
            .cloned())
    }

    async fn create(
        &self,
        target_kind: LikeTarget,
        target_id: Uuid,
        user_id: Uuid,
    ) -> Result<Like, DomainError> {
        if let Some(existing) = LikeRepository::find(self, target_kind, target_id, user_id).await? {
            return Ok(existing);
        }
        self.add_like(target_kind, target_id, user_id);
        LikeRepository::find(self, target_kind, target_id, user_id)
            .await?
            .ok_or_else(|| DomainError::InternalError("like vanished after insert".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.state.lock().unwrap().likes.retain(|l| l.id != id);
        Ok(())
    }
}

#[async_trait]
impl FeedRepository for InMemoryStore {
    async fn count(&self, filter: FeedFilter) -> Result<i64, DomainError> {
        let state = self.state.lock().unwrap();
        let total = match filter {
            FeedFilter::TweetsByOwner(owner_id) => {
                state.tweets.iter().filter(|t| t.owner_id == owner_id).count()
            }
            FeedFilter::CommentsOnVideo(video_id) => {
                state.comments.iter().filter(|c| c.video_id == video_id).count()
            }
        };
        Ok(total as i64)
    }

    async fn fetch(
        &self,
        filter: FeedFilter,
        requester: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedItem>, DomainError> {
        let state = self.state.lock().unwrap();

        // (id, content, owner, created_at, like kind)
        let mut rows: Vec<(Uuid, String, Uuid, DateTime<Utc>, LikeTarget)> = match filter {
            FeedFilter::TweetsByOwner(owner_id) => state
                .tweets
                .iter()
                .filter(|t| t.owner_id == owner_id)
                .map(|t| (t.id, t.content.clone(), t.owner_id, t.created_at, LikeTarget::Tweet))
                .collect(),
            FeedFilter::CommentsOnVideo(video_id) => state
                .comments
                .iter()
                .filter(|c| c.video_id == video_id)
                .map(|c| (c.id, c.content.clone(), c.owner_id, c.created_at, LikeTarget::Comment))
                .collect(),
        };
        rows.sort_by(|a, b| b.3.cmp(&a.3).then(b.0.cmp(&a.0)));

        rows.into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(id, content, owner_id, created_at, kind)| {
                let owner = state
                    .users
                    .iter()
                    .find(|u| u.id == owner_id)
                    .ok_or(DomainError::UserNotFound)?;
                let likes: Vec<&Like> = state
                    .likes
                    .iter()
                    .filter(|l| l.target_kind == kind && l.target_id == id)
                    .collect();

                Ok(FeedItem {
                    id,
                    content,
                    owner: AuthorSummary {
                        id: owner.id,
                        username: owner.username.clone(),
                        full_name: owner.full_name.clone(),
                        avatar: owner.avatar.clone(),
                    },
                    likes_count: likes.len() as i64,
                    is_liked: requester.is_some_and(|r| likes.iter().any(|l| l.liked_by == r)),
                    created_at,
                })
            })
            .collect()
    }
}

/// Media store that remembers the names it was given instead of touching disk.
#[derive(Default)]
pub struct FakeMediaStore {
    stored: Mutex<Vec<String>>,
}

impl FakeMediaStore {
    /// File names currently held, in upload order.
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn store(&self, upload: &MediaUpload) -> Result<String, DomainError> {
        check_image(upload)?;
        let name = upload
            .file_name
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.stored.lock().unwrap().push(name.clone());
        Ok(format!("/uploads/{}", name))
    }

    async fn remove(&self, url: &str) -> Result<(), DomainError> {
        if let Some(name) = url.strip_prefix("/uploads/") {
            let mut stored = self.stored.lock().unwrap();
            if let Some(pos) = stored.iter().position(|n| n == name) {
                stored.remove(pos);
            }
        }
        Ok(())
    }
}
