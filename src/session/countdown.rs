use std::time::Duration;

use tokio::time::Instant;

/// Countdown length used when nothing else is configured.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Seconds left, from the full duration down to 1.
    Tick(u32),
    /// The countdown reached zero. Emitted exactly once.
    Complete,
}

/// One-shot decrementing timer.
///
/// Event `k` fires at `start + k * period`: `Tick(d)` immediately, `Tick(1)` at `d - 1`
/// periods, `Complete` at `d` periods. Dropping a pending [`Countdown::next`] future leaves the
/// countdown untouched, and dropping the countdown suppresses its completion.
#[derive(Debug)]
pub struct Countdown {
    duration: u32,
    emitted: u32,
    started_at: Instant,
    period: Duration,
    done: bool,
}

impl Countdown {
    /// Start a countdown of `duration_secs` one-second ticks, anchored at the current instant.
    pub fn start(duration_secs: u32) -> Self {
        Self::with_period(duration_secs, Duration::from_secs(1))
    }

    pub fn with_period(duration: u32, period: Duration) -> Self {
        Self {
            duration,
            emitted: 0,
            started_at: Instant::now(),
            period,
            done: false,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Ticks not yet emitted.
    pub fn remaining(&self) -> u32 {
        self.duration - self.emitted
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Wait for the next event. Returns `None` once `Complete` has been delivered.
    pub async fn next(&mut self) -> Option<CountdownEvent> {
        if self.done {
            return None;
        }

        let deadline = self.started_at + self.period * self.emitted;
        tokio::time::sleep_until(deadline).await;

        if self.emitted < self.duration {
            let value = self.duration - self.emitted;
            self.emitted += 1;
            Some(CountdownEvent::Tick(value))
        } else {
            self.done = true;
            Some(CountdownEvent::Complete)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/countdown.rs"]
mod tests;
