use crate::domain::DomainError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An uploaded file that has already been spooled to a temporary path.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub path: PathBuf,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persists the upload and returns the public URL it will be served from.
    async fn store(&self, upload: &MediaUpload) -> Result<String, DomainError>;

    /// Deletes a file previously returned by `store`. Unknown URLs are ignored.
    async fn remove(&self, url: &str) -> Result<(), DomainError>;
}

pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub async fn new(root: PathBuf, base_url: impl Into<String>) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!("Media uploads are stored in {:?}", root);

        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    fn stored_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(self.base_url.trim_end_matches('/'))?
            .strip_prefix('/')?;
        let plain = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !name.starts_with('.');
        plain.then_some(name)
    }
}

/// Only images are accepted, up to `MAX_IMAGE_BYTES`.
pub fn check_image(upload: &MediaUpload) -> Result<(), DomainError> {
    if upload.size == 0 {
        return Err(DomainError::validation("Uploaded file is empty"));
    }
    if upload.size > MAX_IMAGE_BYTES {
        return Err(DomainError::validation(format!(
            "Uploaded file exceeds {} bytes",
            MAX_IMAGE_BYTES
        )));
    }
    match upload.content_type.as_deref() {
        Some(ct) if ct.starts_with("image/") => Ok(()),
        Some(ct) => Err(DomainError::validation(format!(
            "Unsupported file type: {}",
            ct
        ))),
        None => Err(DomainError::validation("Missing file content type")),
    }
}

fn extension(file_name: Option<&str>) -> Option<String> {
    let ext = Path::new(file_name?).extension()?.to_str()?;
    if ext.chars().all(|c| c.is_ascii_alphanumeric()) && ext.len() <= 8 {
        Some(ext.to_ascii_lowercase())
    } else {
        None
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, upload: &MediaUpload) -> Result<String, DomainError> {
        check_image(upload)?;

        let name = match extension(upload.file_name.as_deref()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let target = self.root.join(&name);

        tokio::fs::copy(&upload.path, &target).await.map_err(|e| {
            tracing::error!("Failed to store upload at {:?}: {}", target, e);
            DomainError::InternalError(format!("Failed to store upload: {}", e))
        })?;

        tracing::debug!("Stored upload {:?} as {}", upload.file_name, name);
        Ok(self.public_url(&name))
    }

    async fn remove(&self, url: &str) -> Result<(), DomainError> {
        let Some(name) = self.stored_name(url) else {
            tracing::warn!("Refusing to remove media outside the store: {}", url);
            return Ok(());
        };

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => {
                tracing::debug!("Removed stored upload {}", name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::InternalError(format!(
                "Failed to remove upload: {}",
                e
            ))),
        }
    }
}
