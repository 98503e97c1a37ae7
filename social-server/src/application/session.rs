use crate::data::user_repository::UserRepository;
use crate::domain::user::{TokenPair, UserResponse};
use crate::domain::{DomainError, User};
use crate::infrastructure::jwt::JwtService;
use std::sync::Arc;
use uuid::Uuid;

/// Issues, verifies, rotates and revokes access/refresh token pairs.
///
/// Each user has at most one live refresh token: issuing a new pair overwrites
/// the stored one, so logging in again (or refreshing) invalidates whatever
/// refresh token another client was holding.
pub struct SessionManager {
    user_repo: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
}

impl SessionManager {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            user_repo,
            jwt_service,
        }
    }

    pub async fn issue(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access_token = self.jwt_service.generate_access_token(user)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id)?;

        self.user_repo
            .set_refresh_token(user.id, Some(&refresh_token))
            .await
            .map_err(|e| {
                tracing::error!("Failed to persist refresh token for {}: {:?}", user.id, e);
                e
            })?;

        tracing::debug!("Session issued for user_id={}", user.id);

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Uuid, DomainError> {
        self.jwt_service.verify_access_token(token)
    }

    /// Verifies the access token and loads the principal it names.
    pub async fn authenticate(&self, token: &str) -> Result<UserResponse, DomainError> {
        let user_id = self.verify_access(token)?;

        match self.user_repo.find_by_id(user_id).await {
            Ok(user) => Ok(UserResponse::from(user)),
            Err(DomainError::UserNotFound) => {
                tracing::warn!("Access token for unknown user_id={}", user_id);
                Err(DomainError::Unauthorized("Invalid access token".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let user_id = self
            .jwt_service
            .verify_refresh_token(refresh_token)
            .map_err(|_| DomainError::Unauthorized("Invalid refresh token".to_string()))?;

        let user = match self.user_repo.find_by_id(user_id).await {
            Ok(user) => user,
            Err(DomainError::UserNotFound) => {
                return Err(DomainError::Unauthorized("Invalid refresh token".to_string()))
            }
            Err(e) => return Err(e),
        };

        if user.refresh_token.as_deref() != Some(refresh_token) {
            tracing::warn!("Stale or replayed refresh token for user_id={}", user_id);
            return Err(DomainError::Unauthorized(
                "Refresh token is expired or used".to_string(),
            ));
        }

        let pair = self.issue(&user).await?;
        tracing::info!("Session rotated for user_id={}", user_id);
        Ok(pair)
    }

    pub async fn revoke(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.user_repo.set_refresh_token(user_id, None).await?;
        tracing::info!("Session revoked for user_id={}", user_id);
        Ok(())
    }
}
