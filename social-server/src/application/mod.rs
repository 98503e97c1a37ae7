pub mod auth_service;
pub mod comment_service;
pub mod feed_service;
pub mod guard;
pub mod like_service;
pub mod session;
pub mod tweet_service;

pub use auth_service::AuthService;
pub use comment_service::CommentService;
pub use feed_service::FeedService;
pub use like_service::LikeService;
pub use session::SessionManager;
pub use tweet_service::TweetService;
