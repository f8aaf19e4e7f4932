use crate::capture::source::FrameSource;
use crate::config::BoothConfig;
use crate::foundation::error::BoothResult;
use crate::session::sequencer::{CaptureSequencer, SequencerOpts, SessionHandle, SessionOutcome};
use crate::session::state::SessionStatus;
use crate::strip::compositor::{CompositeArtifact, StripCompositor};

/// A configured booth: runs capture sessions and keeps the most recent good strip.
pub struct PhotoBooth {
    config: BoothConfig,
    compositor: StripCompositor,
    last: Option<CompositeArtifact>,
}

impl PhotoBooth {
    pub fn new(config: BoothConfig) -> BoothResult<Self> {
        config.validate()?;
        let compositor = StripCompositor::new(config.strip.clone())?;
        Ok(Self {
            config,
            compositor,
            last: None,
        })
    }

    pub fn config(&self) -> &BoothConfig {
        &self.config
    }

    pub fn compositor(&self) -> &StripCompositor {
        &self.compositor
    }

    /// The last strip composed successfully, if any.
    pub fn artifact(&self) -> Option<&CompositeArtifact> {
        self.last.as_ref()
    }

    /// Prepare a session over `source` using the configured count and timings.
    ///
    /// Attach an event channel with [`CaptureSequencer::with_events`] before handing the
    /// sequencer to [`PhotoBooth::run_session`].
    pub fn sequencer<'a, S: FrameSource + ?Sized>(
        &self,
        source: &'a mut S,
    ) -> BoothResult<(CaptureSequencer<'a, S>, SessionHandle)> {
        let s = &self.config.session;
        CaptureSequencer::new(source, s.target_count, SequencerOpts::from(s))
    }

    /// Run a session to its end and, if it completed, compose its strip.
    ///
    /// A compositor failure is returned as an error; the previously stored strip is kept.
    pub async fn run_session<S: FrameSource + ?Sized>(
        &mut self,
        sequencer: CaptureSequencer<'_, S>,
    ) -> BoothResult<SessionOutcome> {
        let outcome = sequencer.run().await?;
        self.finish(&outcome)?;
        Ok(outcome)
    }

    /// Drop the current strip, then run a fresh session.
    pub async fn retake<S: FrameSource + ?Sized>(
        &mut self,
        sequencer: CaptureSequencer<'_, S>,
    ) -> BoothResult<SessionOutcome> {
        self.last = None;
        self.run_session(sequencer).await
    }

    /// Compose the strip for a finished session. Sessions that did not complete leave the
    /// stored strip untouched.
    pub fn finish(&mut self, outcome: &SessionOutcome) -> BoothResult<Option<&CompositeArtifact>> {
        if outcome.status != SessionStatus::Complete {
            tracing::debug!(status = ?outcome.status, "session ended without a strip");
            return Ok(None);
        }
        match self.compositor.compose(&outcome.images) {
            Ok(artifact) => {
                self.last = Some(artifact);
                Ok(self.last.as_ref())
            }
            Err(err) => {
                tracing::error!(error = %err, "strip composition failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/booth.rs"]
mod tests;
