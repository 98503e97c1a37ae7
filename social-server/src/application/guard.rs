use crate::domain::content::Owned;
use crate::domain::DomainError;
use uuid::Uuid;

pub fn owns(acting_user_id: Uuid, record: &impl Owned) -> bool {
    record.owner_id() == acting_user_id
}

/// Fails with `Forbidden` unless `acting_user_id` owns `record`.
pub fn ensure_owner(acting_user_id: Uuid, record: &impl Owned) -> Result<(), DomainError> {
    if owns(acting_user_id, record) {
        Ok(())
    } else {
        tracing::warn!(
            "User {} attempted to modify a record owned by {}",
            acting_user_id,
            record.owner_id()
        );
        Err(DomainError::Forbidden)
    }
}
