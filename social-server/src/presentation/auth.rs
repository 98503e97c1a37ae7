use crate::application::AuthService;
use crate::domain::user::{TokenPair, UserResponse};
use crate::domain::DomainError;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// The authenticated principal of a request.
///
/// Extracting it verifies the access token (cookie first, then `Authorization: Bearer`)
/// and loads the user. Use `Option<CurrentUser>` on routes where auth is optional.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserResponse);

impl CurrentUser {
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }
}

pub fn access_token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    Authorization::<Bearer>::parse(req)
        .ok()
        .map(|auth| auth.into_scheme().token().to_string())
}

impl FromRequest for CurrentUser {
    type Error = DomainError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = access_token_from_request(req);
        let auth_service = req.app_data::<web::Data<AuthService>>().cloned();

        Box::pin(async move {
            let auth_service = auth_service.ok_or_else(|| {
                DomainError::InternalError("Auth service not configured".to_string())
            })?;
            let token = token
                .ok_or_else(|| DomainError::Unauthorized("Access token is missing".to_string()))?;

            let user = auth_service.sessions().authenticate(&token).await?;
            Ok(CurrentUser(user))
        })
    }
}

/// Builds the `HttpOnly` cookies that carry a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    pub secure: bool,
}

impl SessionCookies {
    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build(name, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .finish()
    }

    pub fn issue(&self, pair: &TokenPair) -> [Cookie<'static>; 2] {
        [
            self.cookie(ACCESS_COOKIE, pair.access_token.clone()),
            self.cookie(REFRESH_COOKIE, pair.refresh_token.clone()),
        ]
    }

    pub fn clear(&self) -> [Cookie<'static>; 2] {
        [ACCESS_COOKIE, REFRESH_COOKIE].map(|name| {
            let mut cookie = self.cookie(name, String::new());
            cookie.make_removal();
            cookie
        })
    }
}
