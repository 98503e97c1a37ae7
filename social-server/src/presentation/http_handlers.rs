use super::auth::{CurrentUser, SessionCookies, REFRESH_COOKIE};
use super::response::{self, ApiResponse};
use crate::application::{AuthService, CommentService, FeedService, LikeService, TweetService};
use crate::domain::comment::CommentRequest;
use crate::domain::feed::{PageQuery, PageRequest};
use crate::domain::tweet::TweetRequest;
use crate::domain::user::{LoginUserRequest, RefreshTokenRequest, RegisterUserRequest, TokenPair};
use crate::domain::{DomainError, LikeTarget};
use crate::infrastructure::media::MediaUpload;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

// Multipart-форма регистрации: текстовые поля и два изображения
#[derive(Debug, MultipartForm)]
pub struct RegisterForm {
    pub fullname: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub username: Option<Text<String>>,
    pub password: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub avatar: Option<TempFile>,
    #[multipart(rename = "coverImage", limit = "5MB")]
    pub cover_image: Option<TempFile>,
}

fn text(field: Option<Text<String>>) -> String {
    field.map(|t| t.0).unwrap_or_default()
}

fn upload(file: &TempFile) -> MediaUpload {
    MediaUpload {
        path: file.file.path().to_path_buf(),
        file_name: file.file_name.clone(),
        content_type: file.content_type.as_ref().map(|mime| mime.to_string()),
        size: file.size,
    }
}

fn with_session(
    status: StatusCode,
    cookies: &SessionCookies,
    pair: &TokenPair,
    data: impl serde::Serialize,
    message: &str,
) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    for cookie in cookies.issue(pair) {
        builder.cookie(cookie);
    }
    ApiResponse::new(status, data, message).send(builder)
}

// ============== Users ==============

pub async fn register(
    auth_service: web::Data<AuthService>,
    MultipartForm(form): MultipartForm<RegisterForm>,
) -> Result<HttpResponse, DomainError> {
    // Временные файлы живут до конца обработчика
    let avatar = form.avatar.as_ref().map(upload);
    let cover_image = form.cover_image.as_ref().map(upload);

    let req = RegisterUserRequest {
        full_name: text(form.fullname),
        email: text(form.email),
        username: text(form.username),
        password: text(form.password),
    };

    let user = auth_service.register(req, avatar, cover_image).await?;
    Ok(response::created(user, "User registered successfully"))
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    cookies: web::Data<SessionCookies>,
    req: web::Json<LoginUserRequest>,
) -> Result<HttpResponse, DomainError> {
    let login = auth_service.login(req.into_inner()).await?;
    let pair = TokenPair {
        access_token: login.access_token.clone(),
        refresh_token: login.refresh_token.clone(),
    };

    Ok(with_session(
        StatusCode::OK,
        &cookies,
        &pair,
        login,
        "User logged in successfully",
    ))
}

pub async fn logout(
    auth_service: web::Data<AuthService>,
    cookies: web::Data<SessionCookies>,
    user: CurrentUser,
) -> Result<HttpResponse, DomainError> {
    auth_service.logout(user.id()).await?;

    let mut builder = HttpResponse::Ok();
    for cookie in cookies.clear() {
        builder.cookie(cookie);
    }
    Ok(ApiResponse::new(StatusCode::OK, serde_json::json!({}), "User logged out").send(builder))
}

pub async fn refresh_token(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
    cookies: web::Data<SessionCookies>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, DomainError> {
    let token = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token));

    let pair = auth_service.refresh(token.as_deref()).await?;

    Ok(with_session(
        StatusCode::OK,
        &cookies,
        &pair,
        &pair,
        "Access token refreshed",
    ))
}

pub async fn current_user(user: CurrentUser) -> HttpResponse {
    response::ok(user.0, "Current user fetched successfully")
}

// ============== Tweets ==============

pub async fn create_tweet(
    tweet_service: web::Data<TweetService>,
    user: CurrentUser,
    req: web::Json<TweetRequest>,
) -> Result<HttpResponse, DomainError> {
    let tweet = tweet_service
        .create_tweet(user.id(), req.into_inner())
        .await?;
    Ok(response::created(tweet, "Tweet created successfully"))
}

pub async fn get_tweet(
    tweet_service: web::Data<TweetService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let tweet = tweet_service.get_tweet(path.into_inner()).await?;
    Ok(response::ok(tweet, "Tweet fetched successfully"))
}

pub async fn get_user_tweets(
    feed_service: web::Data<FeedService>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
    user: Option<CurrentUser>,
) -> Result<HttpResponse, DomainError> {
    let page = PageRequest::from_query(&query)?;
    let feed = feed_service
        .user_tweets(path.into_inner(), user.map(|u| u.id()), page)
        .await?;
    Ok(response::ok(feed, "Tweets fetched successfully"))
}

pub async fn update_tweet(
    tweet_service: web::Data<TweetService>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<TweetRequest>,
) -> Result<HttpResponse, DomainError> {
    let tweet = tweet_service
        .update_tweet(path.into_inner(), user.id(), req.into_inner())
        .await?;
    Ok(response::ok(tweet, "Tweet updated successfully"))
}

pub async fn delete_tweet(
    tweet_service: web::Data<TweetService>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    tweet_service
        .delete_tweet(path.into_inner(), user.id())
        .await?;
    Ok(response::ok((), "Tweet deleted successfully"))
}

// ============== Comments ==============

pub async fn create_comment(
    comment_service: web::Data<CommentService>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let comment = comment_service
        .create_comment(user.id(), path.into_inner(), req.into_inner())
        .await?;
    Ok(response::created(comment, "Comment added successfully"))
}

pub async fn get_comment(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comment = comment_service.get_comment(path.into_inner()).await?;
    Ok(response::ok(comment, "Comment fetched successfully"))
}

pub async fn get_video_comments(
    feed_service: web::Data<FeedService>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
    user: Option<CurrentUser>,
) -> Result<HttpResponse, DomainError> {
    let page = PageRequest::from_query(&query)?;
    let feed = feed_service
        .video_comments(path.into_inner(), user.map(|u| u.id()), page)
        .await?;
    Ok(response::ok(feed, "Comments fetched successfully"))
}

pub async fn update_comment(
    comment_service: web::Data<CommentService>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let comment = comment_service
        .update_comment(path.into_inner(), user.id(), req.into_inner())
        .await?;
    Ok(response::ok(comment, "Comment updated successfully"))
}

pub async fn delete_comment(
    comment_service: web::Data<CommentService>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    comment_service
        .delete_comment(path.into_inner(), user.id())
        .await?;
    Ok(response::ok((), "Comment deleted successfully"))
}

// ============== Likes ==============

pub async fn toggle_like(
    like_service: web::Data<LikeService>,
    user: CurrentUser,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (kind, target_id) = path.into_inner();
    let kind: LikeTarget = kind.parse()?;

    let result = like_service.toggle(kind, target_id, user.id()).await?;
    let message = if result.is_liked {
        "Liked successfully"
    } else {
        "Like removed successfully"
    };
    Ok(response::ok(result, message))
}
