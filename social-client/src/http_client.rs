use crate::error::SocialClientError;
use crate::models::{
    ApiEnvelope, ApiErrorBody, Comment, ContentRequest, FeedItem, LikeTarget, LikeToggle,
    LoginRequest, LoginResponse, Page, RegisterRequest, Session, Tweet, User,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            session: None,
        }
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(session) => request.bearer_auth(&session.access_token),
            None => request,
        }
    }

    fn require_session(&self) -> Result<&Session, SocialClientError> {
        self.session.as_ref().ok_or(SocialClientError::NotLoggedIn)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    // ============== Users ==============

    pub async fn register(&self, req: RegisterRequest) -> Result<User, SocialClientError> {
        let mut form = Form::new()
            .text("fullname", req.full_name)
            .text("email", req.email)
            .text("username", req.username)
            .text("password", req.password)
            .part("avatar", file_part(&req.avatar).await?);

        if let Some(cover) = &req.cover_image {
            form = form.part("coverImage", file_part(cover).await?);
        }

        let response = self
            .client
            .post(self.url("/users/register"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn login(&mut self, req: LoginRequest) -> Result<LoginResponse, SocialClientError> {
        let response = self
            .client
            .post(self.url("/users/login"))
            .json(&req)
            .send()
            .await?;

        let login: LoginResponse = decode(response).await?;
        self.set_session(login.session());
        Ok(login)
    }

    pub async fn logout(&mut self) -> Result<(), SocialClientError> {
        self.require_session()?;
        let response = self
            .add_auth_header(self.client.post(self.url("/users/logout")))
            .send()
            .await?;

        decode::<serde_json::Value>(response).await?;
        self.clear_session();
        Ok(())
    }

    /// Exchanges the stored refresh token for a new pair and keeps it.
    pub async fn refresh(&mut self) -> Result<Session, SocialClientError> {
        let refresh_token = self.require_session()?.refresh_token.clone();
        let response = self
            .client
            .post(self.url("/users/refresh-token"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        let session: Session = decode(response).await?;
        self.set_session(session.clone());
        Ok(session)
    }

    pub async fn current_user(&self) -> Result<User, SocialClientError> {
        self.require_session()?;
        let response = self
            .add_auth_header(self.client.get(self.url("/users/current-user")))
            .send()
            .await?;
        decode(response).await
    }

    // ============== Tweets ==============

    pub async fn create_tweet(&self, content: String) -> Result<Tweet, SocialClientError> {
        let response = self
            .add_auth_header(self.client.post(self.url("/tweets")))
            .json(&ContentRequest { content })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_tweet(&self, id: Uuid) -> Result<Tweet, SocialClientError> {
        let response = self
            .client
            .get(self.url(&format!("/tweets/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn user_tweets(
        &self,
        user_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<FeedItem>, SocialClientError> {
        self.feed(&format!("/tweets/user/{}", user_id), page, limit)
            .await
    }

    pub async fn update_tweet(&self, id: Uuid, content: String) -> Result<Tweet, SocialClientError> {
        let response = self
            .add_auth_header(self.client.patch(self.url(&format!("/tweets/{}", id))))
            .json(&ContentRequest { content })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_tweet(&self, id: Uuid) -> Result<(), SocialClientError> {
        let response = self
            .add_auth_header(self.client.delete(self.url(&format!("/tweets/{}", id))))
            .send()
            .await?;
        decode(response).await
    }

    // ============== Comments ==============

    pub async fn create_comment(
        &self,
        video_id: Uuid,
        content: String,
    ) -> Result<Comment, SocialClientError> {
        let response = self
            .add_auth_header(self.client.post(self.url(&format!("/comments/{}", video_id))))
            .json(&ContentRequest { content })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, SocialClientError> {
        let response = self
            .client
            .get(self.url(&format!("/comments/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn video_comments(
        &self,
        video_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<FeedItem>, SocialClientError> {
        self.feed(&format!("/comments/video/{}", video_id), page, limit)
            .await
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Comment, SocialClientError> {
        let response = self
            .add_auth_header(self.client.patch(self.url(&format!("/comments/{}", id))))
            .json(&ContentRequest { content })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), SocialClientError> {
        let response = self
            .add_auth_header(self.client.delete(self.url(&format!("/comments/{}", id))))
            .send()
            .await?;
        decode(response).await
    }

    // ============== Likes ==============

    pub async fn toggle_like(
        &self,
        kind: LikeTarget,
        target_id: Uuid,
    ) -> Result<LikeToggle, SocialClientError> {
        let path = format!("/likes/toggle/{}/{}", kind.as_str(), target_id);
        let response = self
            .add_auth_header(self.client.post(self.url(&path)))
            .send()
            .await?;
        decode(response).await
    }

    // The token is optional here: with one, `isLiked` reflects the caller.
    async fn feed(
        &self,
        path: &str,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<FeedItem>, SocialClientError> {
        let response = self
            .add_auth_header(self.client.get(self.url(path)))
            .query(&page_params(page, limit))
            .send()
            .await?;
        decode(response).await
    }
}

fn page_params(page: Option<i64>, limit: Option<i64>) -> Vec<(&'static str, i64)> {
    let mut params = Vec::new();
    if let Some(p) = page {
        params.push(("page", p));
    }
    if let Some(l) = limit {
        params.push(("limit", l));
    }
    params
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn file_part(path: &Path) -> Result<Part, SocialClientError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))?)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SocialClientError> {
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!("HTTP {} ({} bytes)", status, body.len());
    decode_body(status, &body)
}

/// Unwraps the response envelope, or turns an error envelope into `SocialClientError`.
pub(crate) fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, SocialClientError> {
    if status.is_success() {
        let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
        return Ok(envelope.data);
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|err| err.message)
        .unwrap_or_else(|_| body.to_string());
    Err(SocialClientError::from_status(status, message))
}
