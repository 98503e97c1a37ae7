pub mod comment_repository;
pub mod feed_repository;
pub mod like_repository;
pub mod tweet_repository;
pub mod user_repository;
pub mod video_repository;

#[cfg(test)]
pub mod memory;
