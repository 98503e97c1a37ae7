use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub http_port: u16,
    pub cors_allowed_origins: String,
    pub jwt: JwtConfig,
    pub upload_dir: PathBuf,
    pub media_base_url: String,
    pub cookie_secure: bool,
}

impl Config {
    /// Reads the configuration from the process environment (`.env` is loaded by `main`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            http_port: parse_or(&lookup, "HTTP_PORT", 8000)?,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
            jwt: JwtConfig {
                access_secret: required("ACCESS_TOKEN_SECRET")?,
                refresh_secret: required("REFRESH_TOKEN_SECRET")?,
                access_ttl_minutes: parse_or(&lookup, "ACCESS_TOKEN_EXPIRY_MINUTES", 15)?,
                refresh_ttl_days: parse_or(&lookup, "REFRESH_TOKEN_EXPIRY_DAYS", 10)?,
            },
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./public/uploads")),
            media_base_url: lookup("MEDIA_BASE_URL").unwrap_or_else(|| "/uploads".to_string()),
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", true)?,
        })
    }

    pub fn http_addr(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }

    /// Path under which this server serves `upload_dir` itself. `None` when
    /// `MEDIA_BASE_URL` points at an external host.
    pub fn media_mount_path(&self) -> Option<String> {
        let base = self.media_base_url.trim();
        if !base.starts_with('/') || base.starts_with("//") {
            return None;
        }
        let path = base.trim_end_matches('/');
        Some(if path.is_empty() { "/".to_string() } else { path.to_string() })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        _ => Ok(default),
    }
}
