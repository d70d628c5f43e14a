//! Fire-and-forget notifications to the host
//!
//! The game core reports food eaten and rounds lost through [`Feedback`]. It
//! never waits on or inspects the result of a notification.

use std::io::Write;

/// Kind of cue the host should give
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Food was eaten
    Success,
    /// The round ended
    Error,
}

/// Receiver for gameplay cues (haptics, sound, bell)
pub trait Feedback {
    fn notify(&mut self, kind: FeedbackKind);
}

/// Records cues to the log only
#[derive(Debug, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn notify(&mut self, kind: FeedbackKind) {
        log::debug!("feedback: {:?}", kind);
    }
}

/// Rings the terminal bell when a round is lost
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Feedback for TerminalBell<W> {
    fn notify(&mut self, kind: FeedbackKind) {
        log::debug!("feedback: {:?}", kind);

        if kind == FeedbackKind::Error {
            // Failure to ring is not worth interrupting the game for
            if let Err(err) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
                log::warn!("terminal bell failed: {}", err);
            }
        }
    }
}
