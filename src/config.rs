use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::capture::source::CameraConstraints;
use crate::foundation::error::{BoothError, BoothResult};
use crate::strip::style::StripStyle;

/// Photo counts that make a good-looking strip. Any count >= 1 is accepted.
pub const RECOMMENDED_PHOTO_COUNTS: RangeInclusive<u32> = 3..=10;

/// Timing and camera settings for a capture session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub target_count: u32,
    pub countdown_secs: u32,
    pub pause_secs: u32,
    /// Settle time between camera start and the first countdown.
    pub warmup_secs: u32,
    pub camera: CameraConstraints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_count: 4,
            countdown_secs: 3,
            pause_secs: 1,
            warmup_secs: 1,
            camera: CameraConstraints::default(),
        }
    }
}

/// Everything a booth needs, loadable from a JSON file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothConfig {
    pub session: SessionConfig,
    pub strip: StripStyle,
}

impl BoothConfig {
    pub fn load(path: &Path) -> BoothResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> BoothResult<Self> {
        let cfg: Self = serde_json::from_str(s).context("parse config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> BoothResult<()> {
        let s = &self.session;
        if s.target_count == 0 {
            return Err(BoothError::validation("session.target_count must be >= 1"));
        }
        if !RECOMMENDED_PHOTO_COUNTS.contains(&s.target_count) {
            tracing::warn!(
                target_count = s.target_count,
                "photo count outside the recommended 3..=10"
            );
        }
        if s.camera.width == 0 || s.camera.height == 0 {
            return Err(BoothError::validation(
                "session.camera width/height must be > 0",
            ));
        }
        self.strip.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
