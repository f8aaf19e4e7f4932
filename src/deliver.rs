use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::foundation::error::{BoothError, BoothResult};
use crate::strip::compositor::CompositeArtifact;

/// Text offered alongside a shared strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMeta {
    pub title: String,
    pub text: String,
    pub file_name: String,
}

impl Default for ShareMeta {
    fn default() -> Self {
        Self {
            title: "90s Photobooth Strip".to_owned(),
            text: "Check out my totally rad photobooth strip!".to_owned(),
            file_name: "photobooth-strip.jpg".to_owned(),
        }
    }
}

/// A platform share facility (share sheet, messaging hand-off, ...).
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Hand the strip to the platform. Returns [`BoothError::ShareUnavailable`] when the platform
    /// has no way to share files.
    async fn share(&self, artifact: &CompositeArtifact, meta: &ShareMeta) -> BoothResult<()>;
}

/// Share target for platforms without a share facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

#[async_trait]
impl ShareTarget for NoShare {
    async fn share(&self, _artifact: &CompositeArtifact, _meta: &ShareMeta) -> BoothResult<()> {
        Err(BoothError::ShareUnavailable)
    }
}

/// Saves strips as timestamped files in one directory.
#[derive(Debug, Clone)]
pub struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `photobooth-strip-<unix-millis>.jpg`
    pub fn file_name_for(unix_millis: i64) -> String {
        format!(
            "photobooth-strip-{unix_millis}.{}",
            CompositeArtifact::EXTENSION
        )
    }

    /// Write the strip under a name stamped with the current time.
    pub fn save(&self, artifact: &CompositeArtifact) -> BoothResult<PathBuf> {
        self.save_at(artifact, chrono::Utc::now().timestamp_millis())
    }

    pub fn save_at(&self, artifact: &CompositeArtifact, unix_millis: i64) -> BoothResult<PathBuf> {
        let path = self.dir.join(Self::file_name_for(unix_millis));
        artifact.save(&path)?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes().len(), "strip saved");
        Ok(path)
    }
}

/// How a strip reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Shared,
    Downloaded(PathBuf),
}

/// Offer the strip through `share`; on any share failure, save it through `download` instead.
pub async fn deliver<T: ShareTarget + ?Sized>(
    artifact: &CompositeArtifact,
    share: &T,
    meta: &ShareMeta,
    download: &DownloadSink,
) -> BoothResult<Delivery> {
    match share.share(artifact, meta).await {
        Ok(()) => Ok(Delivery::Shared),
        Err(err) => {
            if matches!(err, BoothError::ShareUnavailable) {
                tracing::debug!("sharing unavailable, downloading instead");
            } else {
                tracing::warn!(error = %err, "share failed, downloading instead");
            }
            download.save(artifact).map(Delivery::Downloaded)
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/deliver.rs"]
mod tests;
