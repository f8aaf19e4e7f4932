//! Capture sequencing: the countdown timer, the session state machine, and the async driver
//! that feeds timer and camera events into it.

pub(crate) mod countdown;
pub(crate) mod sequencer;
pub(crate) mod state;
