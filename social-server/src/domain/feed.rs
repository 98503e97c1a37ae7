use super::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Which slice of content a feed is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    TweetsByOwner(Uuid),
    CommentsOnVideo(Uuid),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

/// One denormalized feed entry: the content, its author and its engagement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: Uuid,
    pub content: String,
    pub owner: AuthorSummary,
    pub likes_count: i64,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw `?page=&limit=` values, kept as strings so bad input maps to a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::validation("Page must be a positive integer"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "Limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn from_query(query: &PageQuery) -> Result<Self, DomainError> {
        let page = parse_positive(query.page.as_deref(), "page", DEFAULT_PAGE)?;
        let limit = parse_positive(query.limit.as_deref(), "limit", DEFAULT_LIMIT)?;
        Self::new(page, limit)
    }

    /// Rows to skip, or `None` when the page lies beyond any addressable row.
    pub fn offset(&self) -> Option<i64> {
        (self.page - 1).checked_mul(self.limit)
    }
}

fn parse_positive(raw: Option<&str>, name: &str, default: i64) -> Result<i64, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(DomainError::validation(format!(
                "{} must be a positive integer, got '{}'",
                name, value
            ))),
        },
    }
}

/// A page of results plus the metadata clients use to walk the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub limit: i64,
    pub page: i64,
    pub total_pages: i64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, request: PageRequest) -> Self {
        let total_pages = (total_docs + request.limit - 1) / request.limit;
        let has_prev_page = request.page > 1;
        let has_next_page = request.page < total_pages;

        Self {
            docs,
            total_docs,
            limit: request.limit,
            page: request.page,
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| request.page - 1),
            next_page: has_next_page.then(|| request.page + 1),
        }
    }
}
