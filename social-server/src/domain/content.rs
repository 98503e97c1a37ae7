use super::DomainError;
use uuid::Uuid;

pub const MAX_CONTENT_LEN: usize = 500;

/// Content records that belong to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Trims `content` and checks it is non-empty and within `MAX_CONTENT_LEN` characters.
pub fn validate_content(content: Option<&str>) -> Result<String, DomainError> {
    let content = content.map(str::trim).unwrap_or_default();

    if content.is_empty() {
        return Err(DomainError::validation("Content cannot be empty"));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(DomainError::validation(format!(
            "Content cannot be longer than {} characters",
            MAX_CONTENT_LEN
        )));
    }

    Ok(content.to_string())
}
