pub mod error;
pub mod http_client;
pub mod models;

use error::SocialClientError;
use models::{
    Comment, FeedItem, LikeTarget, LikeToggle, LoginRequest, LoginResponse, Page, RegisterRequest,
    Session, Tweet, User,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Shareable client for the social API.
///
/// Holds the current access/refresh pair: `login` and `refresh` replace it,
/// `logout` drops it, and every authenticated call sends the access token
/// as a Bearer header.
#[derive(Debug, Clone)]
pub struct SocialClient {
    http: Arc<Mutex<http_client::HttpClient>>,
}

impl SocialClient {
    /// Create a client for the server at `base_url` (e.g. "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Arc::new(Mutex::new(http_client::HttpClient::new(base_url))),
        }
    }

    pub async fn base_url(&self) -> String {
        self.http.lock().await.base_url().to_string()
    }

    /// Restore a previously saved session
    pub async fn set_session(&self, session: Session) {
        self.http.lock().await.set_session(session);
    }

    pub async fn session(&self) -> Option<Session> {
        self.http.lock().await.session().cloned()
    }

    pub async fn clear_session(&self) {
        self.http.lock().await.clear_session();
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User, SocialClientError> {
        tracing::debug!("Register called for username: {}", req.username);
        self.http.lock().await.register(req).await
    }

    /// Login by username or email; the session is kept for later calls
    pub async fn login(
        &self,
        username: Option<String>,
        email: Option<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, SocialClientError> {
        let req = LoginRequest {
            username,
            email,
            password: password.into(),
        };
        self.http.lock().await.login(req).await
    }

    pub async fn logout(&self) -> Result<(), SocialClientError> {
        self.http.lock().await.logout().await
    }

    pub async fn refresh(&self) -> Result<Session, SocialClientError> {
        self.http.lock().await.refresh().await
    }

    pub async fn current_user(&self) -> Result<User, SocialClientError> {
        self.http.lock().await.current_user().await
    }

    pub async fn create_tweet(&self, content: impl Into<String>) -> Result<Tweet, SocialClientError> {
        self.http.lock().await.create_tweet(content.into()).await
    }

    pub async fn get_tweet(&self, id: Uuid) -> Result<Tweet, SocialClientError> {
        self.http.lock().await.get_tweet(id).await
    }

    pub async fn user_tweets(
        &self,
        user_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<FeedItem>, SocialClientError> {
        self.http.lock().await.user_tweets(user_id, page, limit).await
    }

    pub async fn update_tweet(
        &self,
        id: Uuid,
        content: impl Into<String>,
    ) -> Result<Tweet, SocialClientError> {
        self.http.lock().await.update_tweet(id, content.into()).await
    }

    pub async fn delete_tweet(&self, id: Uuid) -> Result<(), SocialClientError> {
        self.http.lock().await.delete_tweet(id).await
    }

    pub async fn create_comment(
        &self,
        video_id: Uuid,
        content: impl Into<String>,
    ) -> Result<Comment, SocialClientError> {
        self.http
            .lock()
            .await
            .create_comment(video_id, content.into())
            .await
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, SocialClientError> {
        self.http.lock().await.get_comment(id).await
    }

    pub async fn video_comments(
        &self,
        video_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<FeedItem>, SocialClientError> {
        self.http
            .lock()
            .await
            .video_comments(video_id, page, limit)
            .await
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        content: impl Into<String>,
    ) -> Result<Comment, SocialClientError> {
        self.http.lock().await.update_comment(id, content.into()).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), SocialClientError> {
        self.http.lock().await.delete_comment(id).await
    }

    pub async fn toggle_like(
        &self,
        kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<LikeToggle, SocialClientError> {
        self.http.lock().await.toggle_like(kind, target_id).await
    }
}
