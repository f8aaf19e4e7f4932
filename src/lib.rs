//! Stripbooth is a timed photo-booth engine.
//!
//! A capture session counts down, grabs a mirrored still from a live frame source, pauses, and
//! repeats until it holds the requested number of photos. The stills are then laid out into a
//! retro vertical photo strip and encoded as JPEG.
//!
//! - Configure with a [`BoothConfig`]
//! - Drive a session with a [`CaptureSequencer`] (or through a [`PhotoBooth`])
//! - Compose the result with a [`StripCompositor`] and hand it off with [`deliver`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod booth;
pub(crate) mod capture;
pub(crate) mod config;
pub(crate) mod deliver;
pub(crate) mod session;
pub(crate) mod strip;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::error::{BoothError, BoothResult};

pub use crate::booth::PhotoBooth;
pub use crate::capture::frame::{CAPTURE_JPEG_QUALITY, ImageBuffer, capture};
pub use crate::capture::source::{
    CameraConstraints, DirectoryFrameSource, FrameSource, StaticFrameSource, test_pattern,
};
pub use crate::config::{BoothConfig, RECOMMENDED_PHOTO_COUNTS, SessionConfig};
pub use crate::deliver::{Delivery, DownloadSink, NoShare, ShareMeta, ShareTarget, deliver};
pub use crate::session::countdown::{Countdown, CountdownEvent, DEFAULT_COUNTDOWN_SECS};
pub use crate::session::sequencer::{
    CaptureSequencer, SequencerOpts, SessionEvent, SessionHandle, SessionOutcome,
};
pub use crate::session::state::{Session, SessionInput, SessionStatus, Transition};
pub use crate::strip::compositor::{CompositeArtifact, StripCompositor};
pub use crate::strip::decode::{DecodedImage, decode_all, decode_image};
pub use crate::strip::layout::{StripLayout, fit_within};
pub use crate::strip::style::{BorderStyle, StripStyle, TextStyle};
pub use crate::strip::surface::{CpuSurface, RasterSurface, TextAlign};
pub use crate::strip::text::FontFace;
