use super::config::JwtConfig;
use crate::domain::{DomainError, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims of the short-lived access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of the long-lived refresh token. `jti` makes every issued token unique,
/// so a token replaced within the same second still compares unequal.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn new(name: &str, secret: &str) -> Self {
        tracing::debug!("Initializing {} key with secret length: {}", name, secret.len());

        if secret.len() < 32 {
            tracing::warn!(
                "{} secret is too short ({} chars). Minimum recommended is 32 chars.",
                name,
                secret.len()
            );
        }

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub struct JwtService {
    access: KeyPair,
    refresh: KeyPair,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, DomainError> {
        if config.access_ttl_minutes <= 0 || config.refresh_ttl_days <= 0 {
            return Err(DomainError::InternalError(
                "Token lifetimes must be positive".to_string(),
            ));
        }

        Ok(Self {
            access: KeyPair::new("access token", &config.access_secret),
            refresh: KeyPair::new("refresh token", &config.refresh_secret),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        })
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String, DomainError> {
        tracing::debug!("Generating access token for user_id: {}", user.id);

        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        sign(&claims, &self.access.encoding)
    }

    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        tracing::debug!("Generating refresh token for user_id: {}", user_id);

        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        sign(&claims, &self.refresh.encoding)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Uuid, DomainError> {
        let claims: AccessClaims = verify(token, &self.access.decoding)?;
        tracing::debug!("Access token verified for user_id: {}", claims.sub);
        Ok(claims.sub)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Uuid, DomainError> {
        let claims: RefreshClaims = verify(token, &self.refresh.decoding)?;
        tracing::debug!("Refresh token verified for user_id: {}", claims.sub);
        Ok(claims.sub)
    }
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey) -> Result<String, DomainError> {
    encode(&Header::default(), claims, key).map_err(|e| {
        tracing::error!("Failed to encode token: {}", e);
        DomainError::InternalError(format!("Failed to generate token: {}", e))
    })
}

fn verify<T: DeserializeOwned>(token: &str, key: &DecodingKey) -> Result<T, DomainError> {
    decode::<T>(token, key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            DomainError::Unauthorized(format!("Invalid token: {}", e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret-access-secret-access-secret".into(),
            refresh_secret: "refresh-secret-refresh-secret-refresh-secret".into(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 10,
        }
    }

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: "Alice".into(),
            avatar: String::new(),
            cover_image: String::new(),
            password_hash: String::new(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn access_token_round_trips_user_id() {
        let jwt = JwtService::new(&config()).unwrap();
        let user = user();
        let token = jwt.generate_access_token(&user).unwrap();
        assert_eq!(jwt.verify_access_token(&token).unwrap(), user.id);
    }

    #[test]
    fn access_and_refresh_tokens_are_not_interchangeable() {
        let jwt = JwtService::new(&config()).unwrap();
        let user = user();

        let access = jwt.generate_access_token(&user).unwrap();
        let refresh = jwt.generate_refresh_token(user.id).unwrap();

        assert!(jwt.verify_refresh_token(&access).is_err());
        assert!(jwt.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique() {
        let jwt = JwtService::new(&config()).unwrap();
        let id = Uuid::new_v4();
        assert_ne!(
            jwt.generate_refresh_token(id).unwrap(),
            jwt.generate_refresh_token(id).unwrap()
        );
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let jwt = JwtService::new(&config()).unwrap();
        let past = Utc::now() - Duration::hours(2);
        let claims = RefreshClaims {
            sub: Uuid::new_v4(),
            jti: Uuid::new_v4(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(1)).timestamp(),
        };
        let token = sign(&claims, &jwt.refresh.encoding).unwrap();

        let err = jwt.verify_refresh_token(&token).unwrap_err();
        assert_eq!(err.to_status_code(), 401);
    }

    #[test]
    fn garbage_is_unauthorized() {
        let jwt = JwtService::new(&config()).unwrap();
        assert!(matches!(
            jwt.verify_access_token("not-a-jwt"),
            Err(DomainError::Unauthorized(_))
        ));
    }
}
