use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::capture::frame::{ImageBuffer, capture};
use crate::capture::source::{CameraConstraints, FrameSource};
use crate::config::SessionConfig;
use crate::foundation::error::BoothResult;
use crate::session::countdown::{Countdown, CountdownEvent};
use crate::session::state::{Session, SessionInput, SessionStatus, Transition};

/// Timing and camera parameters for one sequencer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerOpts {
    pub countdown_secs: u32,
    /// Gap after each capture (lets a flash effect play out).
    pub pause: Duration,
    /// Delay between camera acquisition and the first countdown.
    pub warmup: Duration,
    pub constraints: CameraConstraints,
}

impl Default for SequencerOpts {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SequencerOpts {
    fn from(cfg: &SessionConfig) -> Self {
        Self {
            countdown_secs: cfg.countdown_secs,
            pause: Duration::from_secs(u64::from(cfg.pause_secs)),
            warmup: Duration::from_secs(u64::from(cfg.warmup_secs)),
            constraints: cfg.camera,
        }
    }
}

/// Observable progress of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CameraReady,
    Tick { photo: u32, remaining: u32 },
    Captured { photo: u32, width: u32, height: u32 },
    Pausing { photo: u32 },
    Completed { count: u32 },
    Cancelled,
    PermissionDenied,
    Failed { reason: String },
}

/// Cancels the session it was created with. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cancel: std::sync::Arc<watch::Sender<bool>>,
}

impl SessionHandle {
    /// Request cancellation. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub status: SessionStatus,
    /// Stills in capture order. Complete only when `status == Complete`.
    pub images: Vec<ImageBuffer>,
}

type CompletionCallback<'a> = Box<dyn FnOnce(&[ImageBuffer]) + 'a>;

/// Drives a [`Session`] from timers and the frame source.
///
/// Every suspension point races the cancel flag, so a cancelled session never sees another
/// timer or capture input.
pub struct CaptureSequencer<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    opts: SequencerOpts,
    session: Session,
    cancel_rx: watch::Receiver<bool>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    on_complete: Option<CompletionCallback<'a>>,
    released: bool,
}

impl<'a, S: FrameSource + ?Sized> CaptureSequencer<'a, S> {
    pub fn new(
        source: &'a mut S,
        target_count: u32,
        opts: SequencerOpts,
    ) -> BoothResult<(Self, SessionHandle)> {
        let session = Session::new(target_count)?;
        let (tx, rx) = watch::channel(false);
        let seq = Self {
            source,
            opts,
            session,
            cancel_rx: rx,
            events: None,
            on_complete: None,
            released: false,
        };
        Ok((
            seq,
            SessionHandle {
                cancel: std::sync::Arc::new(tx),
            },
        ))
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Called with the full image sequence when the session completes. Never called otherwise.
    pub fn on_complete(mut self, f: impl FnOnce(&[ImageBuffer]) + 'a) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    #[tracing::instrument(
        name = "capture_session",
        skip_all,
        fields(target = self.session.target_count(), countdown = self.opts.countdown_secs)
    )]
    pub async fn run(mut self) -> BoothResult<SessionOutcome> {
        let acquired = tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => None,
            r = self.source.acquire(&self.opts.constraints) => Some(r),
        };

        match acquired {
            None => return self.stop(SessionInput::Cancel),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "camera acquisition failed");
                return self.stop(SessionInput::PermissionError);
            }
            Some(Ok(())) => {
                tracing::info!("camera ready");
                self.emit(SessionEvent::CameraReady);
            }
        }

        if !self.wait(self.opts.warmup).await {
            return self.stop(SessionInput::Cancel);
        }

        let mut next = self.session.apply(SessionInput::Start)?;
        loop {
            next = match next {
                Transition::BeginCountdown => {
                    if !self.count_down().await {
                        return self.stop(SessionInput::Cancel);
                    }
                    self.session.apply(SessionInput::CountdownElapsed)?
                }
                Transition::Capture => match capture(&mut *self.source) {
                    Ok(image) => {
                        let (width, height) = (image.width(), image.height());
                        let t = self.session.apply(SessionInput::Captured(image))?;
                        let photo = self.session.captured().len() as u32;
                        tracing::info!(photo, width, height, "photo captured");
                        self.emit(SessionEvent::Captured {
                            photo,
                            width,
                            height,
                        });
                        t
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "capture failed, ending session");
                        self.emit(SessionEvent::Failed {
                            reason: err.to_string(),
                        });
                        return self.stop(SessionInput::CaptureFailed);
                    }
                },
                Transition::Pause => {
                    self.emit(SessionEvent::Pausing {
                        photo: self.session.captured().len() as u32,
                    });
                    if !self.wait(self.opts.pause).await {
                        return self.stop(SessionInput::Cancel);
                    }
                    self.session.apply(SessionInput::PauseElapsed)?
                }
                Transition::Complete => return Ok(self.complete()),
                Transition::Stopped | Transition::Ignored => return Ok(self.outcome()),
            };
        }
    }

    /// Run one countdown to completion. Returns `false` if cancelled first.
    async fn count_down(&mut self) -> bool {
        let photo = self.session.current_photo();
        let mut countdown = Countdown::start(self.opts.countdown_secs);
        loop {
            let ev = tokio::select! {
                biased;
                _ = cancelled(&mut self.cancel_rx) => return false,
                ev = countdown.next() => ev,
            };
            match ev {
                Some(CountdownEvent::Tick(remaining)) => {
                    tracing::debug!(photo, remaining, "countdown tick");
                    self.emit(SessionEvent::Tick { photo, remaining });
                }
                Some(CountdownEvent::Complete) | None => return true,
            }
        }
    }

    /// Sleep unless cancelled. Returns `false` if cancelled first.
    async fn wait(&mut self, d: Duration) -> bool {
        if *self.cancel_rx.borrow() {
            return false;
        }
        if d.is_zero() {
            return true;
        }
        tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => false,
            _ = tokio::time::sleep(d) => true,
        }
    }

    fn complete(mut self) -> SessionOutcome {
        self.release_source();
        let count = self.session.captured().len() as u32;
        tracing::info!(count, "session complete");
        if let Some(f) = self.on_complete.take() {
            f(self.session.captured());
        }
        self.emit(SessionEvent::Completed { count });
        self.outcome()
    }

    fn stop(mut self, input: SessionInput) -> BoothResult<SessionOutcome> {
        self.session.apply(input)?;
        self.release_source();
        match self.session.status() {
            SessionStatus::Cancelled => {
                tracing::info!(captured = self.session.captured().len(), "session cancelled");
                self.emit(SessionEvent::Cancelled);
            }
            SessionStatus::PermissionDenied => self.emit(SessionEvent::PermissionDenied),
            _ => {}
        }
        Ok(self.outcome())
    }

    fn outcome(self) -> SessionOutcome {
        SessionOutcome {
            status: self.session.status(),
            images: self.session.into_captured(),
        }
    }

    fn release_source(&mut self) {
        if !self.released {
            self.source.release();
            self.released = true;
        }
    }

    fn emit(&self, ev: SessionEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is watching.
            let _ = tx.send(ev);
        }
    }
}

/// Resolves once the flag is set. Never resolves if every handle was dropped uncancelled.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|c| *c).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sequencer.rs"]
mod tests;
