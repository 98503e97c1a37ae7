use super::session::SessionManager;
use crate::data::user_repository::UserRepository;
use crate::domain::user::{
    LoginResponse, LoginUserRequest, NewUser, RegisterUserRequest, TokenPair, UserResponse,
};
use crate::domain::DomainError;
use crate::infrastructure::media::{MediaStore, MediaUpload};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use std::sync::Arc;
use uuid::Uuid;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
    media: Arc<dyn MediaStore>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        sessions: Arc<SessionManager>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            user_repo,
            sessions,
            media,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub async fn register(
        &self,
        req: RegisterUserRequest,
        avatar: Option<MediaUpload>,
        cover_image: Option<MediaUpload>,
    ) -> Result<UserResponse, DomainError> {
        tracing::debug!("=== REGISTRATION START ===");

        let full_name = req.full_name.trim();
        let email = req.email.trim().to_lowercase();
        let username = req.username.trim().to_lowercase();

        if [full_name, email.as_str(), username.as_str(), req.password.as_str()]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(DomainError::validation("All fields are required"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("Email address is invalid"));
        }

        tracing::debug!("Username: {}, Email: {}", username, email);

        if self.user_repo.exists(&username, &email).await? {
            tracing::warn!("Registration failed: username or email already taken");
            return Err(DomainError::UserAlreadyExists);
        }

        let avatar = avatar.ok_or_else(|| DomainError::validation("Avatar file is required"))?;

        tracing::debug!("Hashing password...");
        let password_hash = hash_password(&req.password)?;

        let avatar_url = self.media.store(&avatar).await?;
        let cover_image_url = match cover_image {
            Some(cover) => match self.media.store(&cover).await {
                Ok(url) => url,
                Err(e) => {
                    self.discard_media(&[avatar_url.as_str()]).await;
                    return Err(e);
                }
            },
            None => String::new(),
        };

        let created = self
            .user_repo
            .create(NewUser {
                username,
                email,
                full_name: full_name.to_string(),
                avatar: avatar_url.clone(),
                cover_image: cover_image_url.clone(),
                password_hash,
            })
            .await;

        let user = match created {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Registration insert failed, discarding uploads: {}", e);
                self.discard_media(&[avatar_url.as_str(), cover_image_url.as_str()])
                    .await;
                return Err(e);
            }
        };

        tracing::info!(
            "User registered successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, req: LoginUserRequest) -> Result<LoginResponse, DomainError> {
        tracing::debug!("=== LOGIN START ===");

        let username = req
            .username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let email_lower = req
            .email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let email = email_lower.as_deref();

        if username.is_none() && email.is_none() {
            return Err(DomainError::validation("Username or email is required"));
        }

        let user = match self.user_repo.find_by_login(username, email).await {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Login for unknown user: {:?} / {:?}", username, email);
                return Err(e);
            }
        };

        verify_password(&req.password, &user.password_hash).map_err(|e| {
            tracing::warn!("Invalid password for user {}", user.username);
            e
        })?;

        let TokenPair {
            access_token,
            refresh_token,
        } = self.sessions.issue(&user).await?;

        tracing::info!(
            "User logged in successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok(LoginResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
        })
    }

    pub async fn logout(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.sessions.revoke(user_id).await
    }

    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<TokenPair, DomainError> {
        let token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Unauthorized("Refresh token is missing".to_string()))?;

        self.sessions.rotate(token).await
    }

    async fn discard_media(&self, urls: &[&str]) {
        for url in urls.iter().filter(|u| !u.is_empty()) {
            if let Err(e) = self.media.remove(url).await {
                tracing::error!("Failed to discard upload {}: {}", url, e);
            }
        }
    }
}

fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            DomainError::InternalError(format!("Password hashing failed: {}", e))
        })
}

fn verify_password(password: &str, password_hash: &str) -> Result<(), DomainError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!("Invalid password hash format: {}", e);
        DomainError::InternalError(format!("Invalid password hash: {}", e))
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| DomainError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{FakeMediaStore, InMemoryStore};
    use crate::domain::User;
    use async_trait::async_trait;
    use crate::infrastructure::config::JwtConfig;
    use crate::infrastructure::jwt::JwtService;
    use std::path::PathBuf;

    struct Fixture {
        store: Arc<InMemoryStore>,
        media: Arc<FakeMediaStore>,
        auth: AuthService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let media = Arc::new(FakeMediaStore::default());
        let jwt = Arc::new(
            JwtService::new(&JwtConfig {
                access_secret: "test-access-secret-test-access-secret".into(),
                refresh_secret: "test-refresh-secret-test-refresh-secret".into(),
                access_ttl_minutes: 15,
                refresh_ttl_days: 10,
            })
            .unwrap(),
        );
        let sessions = Arc::new(SessionManager::new(store.clone(), jwt));
        let auth = AuthService::new(store.clone(), sessions, media.clone());
        Fixture { store, media, auth }
    }

    fn image(name: &str) -> MediaUpload {
        MediaUpload {
            path: PathBuf::from("/tmp/ignored"),
            file_name: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            size: 128,
        }
    }

    fn register_request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            full_name: "Alice Liddell".into(),
            email: format!("{}@example.com", username.to_lowercase()),
            username: username.into(),
            password: "correct horse".into(),
        }
    }

    #[actix_rt::test]
    async fn register_stores_images_and_lowercases_username() {
        let f = fixture();

        let user = f
            .auth
            .register(register_request("Alice"), Some(image("a.png")), Some(image("c.png")))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.avatar, "/uploads/a.png");
        assert_eq!(user.cover_image, "/uploads/c.png");
        assert_eq!(f.media.stored(), vec!["a.png", "c.png"]);
    }

    #[actix_rt::test]
    async fn register_without_cover_leaves_it_empty() {
        let f = fixture();
        let user = f
            .auth
            .register(register_request("bob"), Some(image("b.png")), None)
            .await
            .unwrap();
        assert_eq!(user.cover_image, "");
    }

    #[actix_rt::test]
    async fn register_requires_avatar() {
        let f = fixture();
        let err = f
            .auth
            .register(register_request("alice"), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_status_code(), 400);
        assert!(f.media.stored().is_empty());
    }

    #[actix_rt::test]
    async fn register_requires_all_fields() {
        let f = fixture();
        let mut req = register_request("alice");
        req.full_name = "   ".into();

        let err = f
            .auth
            .register(req, Some(image("a.png")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn register_rejects_duplicates() {
        let f = fixture();
        f.auth
            .register(register_request("alice"), Some(image("a.png")), None)
            .await
            .unwrap();

        let err = f
            .auth
            .register(register_request("ALICE"), Some(image("a.png")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserAlreadyExists));
    }

    #[actix_rt::test]
    async fn login_issues_both_tokens() {
        let f = fixture();
        let user = f
            .auth
            .register(register_request("alice"), Some(image("a.png")), None)
            .await
            .unwrap();

        let login = f
            .auth
            .login(LoginUserRequest {
                username: Some("alice".into()),
                email: None,
                password: "correct horse".into(),
            })
            .await
            .unwrap();

        assert_eq!(login.user.id, user.id);
        assert!(!login.access_token.is_empty());
        assert_eq!(
            f.store.stored_refresh_token(user.id),
            Some(login.refresh_token)
        );
    }

    #[actix_rt::test]
    async fn login_by_email_works() {
        let f = fixture();
        f.auth
            .register(register_request("alice"), Some(image("a.png")), None)
            .await
            .unwrap();

        let login = f
            .auth
            .login(LoginUserRequest {
                username: None,
                email: Some("alice@example.com".into()),
                password: "correct horse".into(),
            })
            .await;
        assert!(login.is_ok());
    }

    #[actix_rt::test]
    async fn login_by_email_ignores_case() {
        let f = fixture();
        let mut req = register_request("alice");
        req.email = "Alice@Example.com".into();
        let user = f
            .auth
            .register(req, Some(image("a.png")), None)
            .await
            .unwrap();

        let login = f
            .auth
            .login(LoginUserRequest {
                username: None,
                email: Some("Alice@Example.com".into()),
                password: "correct horse".into(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, user.id);
    }

    #[actix_rt::test]
    async fn username_wins_over_another_users_email() {
        let f = fixture();
        let alice = f
            .auth
            .register(register_request("alice"), Some(image("a.png")), None)
            .await
            .unwrap();
        f.auth
            .register(register_request("bob"), Some(image("b.png")), None)
            .await
            .unwrap();

        let login = f
            .auth
            .login(LoginUserRequest {
                username: Some("alice".into()),
                email: Some("bob@example.com".into()),
                password: "correct horse".into(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, alice.id);
    }

    /// Lets the duplicate pre-check pass so the insert itself hits the conflict.
    struct RacingUsers(Arc<InMemoryStore>);

    #[async_trait]
    impl UserRepository for RacingUsers {
        async fn create(&self, user: NewUser) -> Result<User, DomainError> {
            UserRepository::create(&*self.0, user).await
        }
        async fn find_by_id(&self, id: Uuid) -> Result<User, DomainError> {
            UserRepository::find_by_id(&*self.0, id).await
        }
        async fn find_by_login(
            &self,
            username: Option<&str>,
            email: Option<&str>,
        ) -> Result<User, DomainError> {
            UserRepository::find_by_login(&*self.0, username, email).await
        }
        async fn exists(&self, _username: &str, _email: &str) -> Result<bool, DomainError> {
            Ok(false)
        }
        async fn set_refresh_token(
            &self,
            id: Uuid,
            token: Option<&str>,
        ) -> Result<(), DomainError> {
            UserRepository::set_refresh_token(&*self.0, id, token).await
        }
    }

    #[actix_rt::test]
    async fn failed_insert_discards_stored_images() {
        let f = fixture();
        f.auth
            .register(register_request("alice"), Some(image("first.png")), None)
            .await
            .unwrap();

        let racing = AuthService::new(
            Arc::new(RacingUsers(f.store.clone())),
            f.auth.sessions.clone(),
            f.media.clone(),
        );
        let err = racing
            .register(
                register_request("alice"),
                Some(image("second.png")),
                Some(image("cover.png")),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UserAlreadyExists));
        assert_eq!(f.media.stored(), vec!["first.png"]);
    }

    #[actix_rt::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let f = fixture();
        f.auth
            .register(register_request("alice"), Some(image("a.png")), None)
            .await
            .unwrap();

        let err = f
            .auth
            .login(LoginUserRequest {
                username: Some("alice".into()),
                email: None,
                password: "battery staple".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
        assert_eq!(err.to_status_code(), 401);
    }

    #[actix_rt::test]
    async fn login_needs_an_identifier() {
        let f = fixture();
        let err = f
            .auth
            .login(LoginUserRequest {
                username: Some(" ".into()),
                email: None,
                password: "x".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_status_code(), 400);
    }

    #[actix_rt::test]
    async fn login_unknown_user_is_not_found() {
        let f = fixture();
        let err = f
            .auth
            .login(LoginUserRequest {
                username: Some("ghost".into()),
                email: None,
                password: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }

    #[actix_rt::test]
    async fn refresh_without_token_is_unauthorized() {
        let f = fixture();
        assert!(matches!(
            f.auth.refresh(None).await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            f.auth.refresh(Some("  ")).await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn logout_then_refresh_fails() {
        let f = fixture();
        f.auth
            .register(register_request("alice"), Some(image("a.png")), None)
            .await
            .unwrap();
        let login = f
            .auth
            .login(LoginUserRequest {
                username: Some("alice".into()),
                email: None,
                password: "correct horse".into(),
            })
            .await
            .unwrap();

        f.auth.logout(login.user.id).await.unwrap();

        let err = f
            .auth
            .refresh(Some(&login.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(err.to_status_code(), 401);
    }
}
