use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use application::{
    AuthService, CommentService, FeedService, LikeService, SessionManager, TweetService,
};
use data::{
    comment_repository::PostgresCommentRepository, feed_repository::PostgresFeedRepository,
    like_repository::PostgresLikeRepository, tweet_repository::PostgresTweetRepository,
    user_repository::PostgresUserRepository, video_repository::PostgresVideoRepository,
};
use infrastructure::{
    config::Config,
    database::{create_pool, run_migrations},
    jwt::JwtService,
    logging::init_logging,
    media::LocalMediaStore,
};
use presentation::{auth::SessionCookies, routes};

/// Все сервисы приложения, общие для воркеров HTTP сервера
struct Services {
    auth: Arc<AuthService>,
    tweets: Arc<TweetService>,
    comments: Arc<CommentService>,
    feed: Arc<FeedService>,
    likes: Arc<LikeService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    init_logging();

    let config = Config::from_env()?;

    tracing::info!("Starting social server...");
    tracing::info!("HTTP server will listen on {}", config.http_addr());
    tracing::info!("CORS allowed origins: {}", config.cors_allowed_origins);

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    // Initialize services
    tracing::info!("Initializing services...");

    let jwt_service = Arc::new(JwtService::new(&config.jwt)?);
    let media_store = Arc::new(
        LocalMediaStore::new(config.upload_dir.clone(), config.media_base_url.clone()).await?,
    );

    // Repositories
    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let tweet_repo = Arc::new(PostgresTweetRepository::new(pool.clone()));
    let comment_repo = Arc::new(PostgresCommentRepository::new(pool.clone()));
    let video_repo = Arc::new(PostgresVideoRepository::new(pool.clone()));
    let like_repo = Arc::new(PostgresLikeRepository::new(pool.clone()));
    let feed_repo = Arc::new(PostgresFeedRepository::new(pool.clone()));

    // Application services
    let sessions = Arc::new(SessionManager::new(user_repo.clone(), jwt_service));
    let services = Services {
        auth: Arc::new(AuthService::new(user_repo.clone(), sessions, media_store)),
        tweets: Arc::new(TweetService::new(tweet_repo.clone())),
        comments: Arc::new(CommentService::new(
            comment_repo.clone(),
            video_repo.clone(),
        )),
        feed: Arc::new(FeedService::new(feed_repo, user_repo, video_repo.clone())),
        likes: Arc::new(LikeService::new(
            like_repo,
            tweet_repo,
            comment_repo,
            video_repo,
        )),
    };

    tracing::info!("Services initialized successfully");

    let cookies = SessionCookies {
        secure: config.cookie_secure,
    };
    if !cookies.secure {
        tracing::warn!("COOKIE_SECURE is off; session cookies will be sent over plain HTTP");
    }

    let media = config
        .media_mount_path()
        .map(|mount| (mount, config.upload_dir.clone()));
    match &media {
        Some((mount, dir)) => tracing::info!("Serving uploads from {:?} at {}", dir, mount),
        None => tracing::info!("Uploads are served externally at {}", config.media_base_url),
    }

    run_http_server(
        config.http_addr(),
        services,
        cookies,
        media,
        config.cors_allowed_origins,
    )
    .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

/// Configure CORS for the HTTP server with allowed origins from .env
fn configure_cors(allowed_origins: &str) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    tracing::info!("Configuring CORS with allowed origins: {}", allowed_origins);

    let origins: Vec<&str> = allowed_origins.split(',').map(|s| s.trim()).collect();

    // Куки сессии требуют supports_credentials
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in origins {
        if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
            tracing::debug!("Added allowed CORS origin: {}", origin);
        }
    }

    cors
}

async fn run_http_server(
    addr: String,
    services: Services,
    cookies: SessionCookies,
    media: Option<(String, PathBuf)>,
    cors_allowed_origins: String,
) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, web, App, HttpServer};

    tracing::info!("Configuring HTTP server...");

    let auth = web::Data::from(services.auth);
    let tweets = web::Data::from(services.tweets);
    let comments = web::Data::from(services.comments);
    let feed = web::Data::from(services.feed);
    let likes = web::Data::from(services.likes);
    let cookies = web::Data::new(cookies);

    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_allowed_origins))
            .app_data(auth.clone())
            .app_data(tweets.clone())
            .app_data(comments.clone())
            .app_data(feed.clone())
            .app_data(likes.clone())
            .app_data(cookies.clone())
            .configure(routes::configure);

        match media.clone() {
            Some((mount, dir)) => app.configure(routes::configure_media(mount, dir)),
            None => app,
        }
    })
    .bind(&addr)?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    Ok(())
}
