use crate::capture::frame::ImageBuffer;
use crate::foundation::error::{BoothError, BoothResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Idle,
    CountingDown,
    Capturing,
    Complete,
    Cancelled,
    PermissionDenied,
    /// A still could not be captured mid-session (no frame, or it failed to encode).
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Cancelled | Self::PermissionDenied | Self::Failed
        )
    }
}

/// Inputs the sequencer feeds into a [`Session`].
#[derive(Debug, Clone)]
pub enum SessionInput {
    Start,
    PermissionError,
    CountdownElapsed,
    Captured(ImageBuffer),
    CaptureFailed,
    PauseElapsed,
    Cancel,
}

impl SessionInput {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PermissionError => "permission error",
            Self::CountdownElapsed => "countdown elapsed",
            Self::Captured(_) => "captured",
            Self::CaptureFailed => "capture failed",
            Self::PauseElapsed => "pause elapsed",
            Self::Cancel => "cancel",
        }
    }
}

/// What the driver must do after an input was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Start a fresh countdown.
    BeginCountdown,
    /// Take exactly one still now.
    Capture,
    /// An image was appended and more are needed: wait out the pause.
    Pause,
    /// The last image was appended.
    Complete,
    /// The session ended in `Cancelled`, `PermissionDenied` or `Failed`.
    Stopped,
    /// The session was already terminal; nothing changed.
    Ignored,
}

/// State of one capture run, mutated only through [`Session::apply`].
#[derive(Debug, Clone)]
pub struct Session {
    target_count: u32,
    captured: Vec<ImageBuffer>,
    status: SessionStatus,
    pausing: bool,
}

impl Session {
    pub fn new(target_count: u32) -> BoothResult<Self> {
        if target_count == 0 {
            return Err(BoothError::validation("target photo count must be >= 1"));
        }
        Ok(Self {
            target_count,
            captured: Vec::with_capacity(target_count as usize),
            status: SessionStatus::Idle,
            pausing: false,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    pub fn captured(&self) -> &[ImageBuffer] {
        &self.captured
    }

    pub fn into_captured(self) -> Vec<ImageBuffer> {
        self.captured
    }

    /// 1-based number of the photo currently being taken (or last taken once complete).
    pub fn current_photo(&self) -> u32 {
        (self.captured.len() as u32 + 1).min(self.target_count)
    }

    pub fn remaining(&self) -> u32 {
        self.target_count - self.captured.len() as u32
    }

    pub fn apply(&mut self, input: SessionInput) -> BoothResult<Transition> {
        use SessionInput as I;
        use SessionStatus as S;

        if self.status.is_terminal() {
            tracing::debug!(status = ?self.status, input = input.name(), "input ignored");
            return Ok(Transition::Ignored);
        }

        let from = self.status;
        let transition = match (from, input) {
            (_, I::Cancel) => {
                self.status = S::Cancelled;
                self.pausing = false;
                Transition::Stopped
            }
            (S::Idle, I::Start) => {
                self.captured.clear();
                self.status = S::CountingDown;
                Transition::BeginCountdown
            }
            (S::Idle, I::PermissionError) => {
                self.status = S::PermissionDenied;
                Transition::Stopped
            }
            (S::CountingDown, I::CountdownElapsed) => {
                self.status = S::Capturing;
                Transition::Capture
            }
            (S::Capturing, I::Captured(image)) if !self.pausing => {
                self.captured.push(image);
                if self.captured.len() as u32 == self.target_count {
                    self.status = S::Complete;
                    Transition::Complete
                } else {
                    self.pausing = true;
                    Transition::Pause
                }
            }
            (S::Capturing, I::CaptureFailed) if !self.pausing => {
                self.status = S::Failed;
                Transition::Stopped
            }
            (S::Capturing, I::PauseElapsed) if self.pausing => {
                self.pausing = false;
                self.status = S::CountingDown;
                Transition::BeginCountdown
            }
            (from, input) => {
                return Err(BoothError::InvalidTransition {
                    from,
                    input: input.name(),
                });
            }
        };

        tracing::debug!(
            from = ?from,
            to = ?self.status,
            captured = self.captured.len(),
            ?transition,
            "session transition"
        );
        Ok(transition)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
