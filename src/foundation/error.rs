use crate::session::state::SessionStatus;

pub type BoothResult<T> = Result<T, BoothError>;

#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no frame available from the live source")]
    NoFrameAvailable,

    #[error("cannot composite an empty image sequence")]
    EmptyInput,

    #[error("failed to decode image #{index}: {reason}")]
    ImageDecodeFailure { index: usize, reason: String },

    #[error("sharing is not available")]
    ShareUnavailable,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid session transition: {input} while {from:?}")]
    InvalidTransition {
        from: SessionStatus,
        input: &'static str,
    },

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn decode(index: usize, reason: impl std::fmt::Display) -> Self {
        Self::ImageDecodeFailure {
            index,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
