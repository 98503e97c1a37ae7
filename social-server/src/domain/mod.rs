pub mod comment;
pub mod content;
pub mod error;
pub mod feed;
pub mod like;
pub mod tweet;
pub mod user;

pub use comment::Comment;
pub use error::DomainError;
pub use like::{Like, LikeTarget};
pub use tweet::Tweet;
pub use user::User;
