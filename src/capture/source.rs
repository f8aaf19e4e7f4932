use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{BoothError, BoothResult};

/// Requested camera stream properties. Sources treat width/height as ideals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConstraints {
    pub width: u32,
    pub height: u32,
    pub front_facing: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            front_facing: true,
        }
    }
}

/// A live, camera-like frame producer.
///
/// One session owns a source exclusively between `acquire` and `release`.
#[async_trait]
pub trait FrameSource: Send {
    /// Start the stream. May suspend while the user decides on permission; refusal is reported
    /// as [`BoothError::PermissionDenied`].
    async fn acquire(&mut self, constraints: &CameraConstraints) -> BoothResult<()>;

    /// Snapshot of the most recent frame, or `None` when nothing has been produced yet.
    fn current_frame(&mut self) -> Option<image::RgbaImage>;

    /// Stop the stream and release the underlying device. Must be idempotent.
    fn release(&mut self);
}

/// In-memory source serving a fixed list of frames in rotation.
#[derive(Debug, Default)]
pub struct StaticFrameSource {
    frames: Vec<image::RgbaImage>,
    next: usize,
    deny_permission: bool,
    frame_limit: Option<usize>,
    served: usize,
    live: bool,
    release_count: usize,
    last_constraints: Option<CameraConstraints>,
}

impl StaticFrameSource {
    pub fn new(frames: Vec<image::RgbaImage>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    /// A single generated frame of the given size; see [`test_pattern`].
    pub fn pattern(width: u32, height: u32) -> Self {
        Self::new(vec![test_pattern(width, height)])
    }

    /// Refuse `acquire` as if the user denied camera access.
    pub fn deny_permission(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    /// Stop producing frames after `n` snapshots, as if the device went away.
    pub fn with_frame_limit(mut self, n: usize) -> Self {
        self.frame_limit = Some(n);
        self
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// How many times `release` stopped a live stream.
    pub fn release_count(&self) -> usize {
        self.release_count
    }

    pub fn last_constraints(&self) -> Option<CameraConstraints> {
        self.last_constraints
    }
}

#[async_trait]
impl FrameSource for StaticFrameSource {
    async fn acquire(&mut self, constraints: &CameraConstraints) -> BoothResult<()> {
        self.last_constraints = Some(*constraints);
        if self.deny_permission {
            return Err(BoothError::PermissionDenied);
        }
        self.live = true;
        Ok(())
    }

    fn current_frame(&mut self) -> Option<image::RgbaImage> {
        if !self.live || self.frames.is_empty() {
            return None;
        }
        if self.frame_limit.is_some_and(|n| self.served >= n) {
            return None;
        }
        let frame = self.frames[self.next % self.frames.len()].clone();
        self.next += 1;
        self.served += 1;
        Some(frame)
    }

    fn release(&mut self) {
        if self.live {
            self.live = false;
            self.release_count += 1;
        }
    }
}

/// Source backed by a directory of image files, served in file-name order and cycled.
///
/// Stands in for a camera on machines without one (CLI runs, demos).
#[derive(Debug)]
pub struct DirectoryFrameSource {
    dir: PathBuf,
    frames: Vec<image::RgbaImage>,
    next: usize,
    live: bool,
}

impl DirectoryFrameSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames: Vec::new(),
            next: 0,
            live: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_frames(
        dir: &Path,
        constraints: &CameraConstraints,
    ) -> BoothResult<Vec<image::RgbaImage>> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read frame directory '{}'", dir.display()))?;

        let mut paths = rd
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_image_path(p))
            .collect::<Vec<_>>();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let img = image::open(&path)
                .with_context(|| format!("decode frame '{}'", path.display()))?
                .into_rgba8();
            // Constraints are ideals: downscale to fit, never upscale.
            let img = if img.width() > constraints.width || img.height() > constraints.height {
                image::DynamicImage::ImageRgba8(img)
                    .resize(
                        constraints.width,
                        constraints.height,
                        image::imageops::FilterType::Triangle,
                    )
                    .into_rgba8()
            } else {
                img
            };
            frames.push(img);
        }
        Ok(frames)
    }
}

#[async_trait]
impl FrameSource for DirectoryFrameSource {
    async fn acquire(&mut self, constraints: &CameraConstraints) -> BoothResult<()> {
        if !self.dir.is_dir() {
            tracing::warn!(dir = %self.dir.display(), "frame directory is not accessible");
            return Err(BoothError::PermissionDenied);
        }
        self.frames = Self::load_frames(&self.dir, constraints)?;
        self.next = 0;
        self.live = true;
        tracing::info!(
            dir = %self.dir.display(),
            frames = self.frames.len(),
            "frame directory opened"
        );
        Ok(())
    }

    fn current_frame(&mut self) -> Option<image::RgbaImage> {
        if !self.live || self.frames.is_empty() {
            return None;
        }
        let frame = self.frames[self.next % self.frames.len()].clone();
        self.next += 1;
        Some(frame)
    }

    fn release(&mut self) {
        self.live = false;
        self.frames.clear();
    }
}

fn is_image_path(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "png" | "jpg" | "jpeg" | "bmp" | "gif" | "webp" | "tif" | "tiff"
    )
}

/// Deterministic RGBA test frame: a horizontal red ramp, a vertical green ramp, and a solid
/// blue marker block in the top-left corner so mirroring is observable.
pub fn test_pattern(width: u32, height: u32) -> image::RgbaImage {
    let marker_w = (width / 8).max(1);
    let marker_h = (height / 8).max(1);
    image::RgbaImage::from_fn(width, height, |x, y| {
        if x < marker_w && y < marker_h {
            return image::Rgba([0, 0, 255, 255]);
        }
        let r = ((x as u64 * 255) / u64::from(width.max(2) - 1)) as u8;
        let g = ((y as u64 * 255) / u64::from(height.max(2) - 1)) as u8;
        image::Rgba([r, g, 64, 255])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/source.rs"]
mod tests;
