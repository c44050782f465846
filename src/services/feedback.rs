use tracing::debug;

/// Player-facing reaction to a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The tapped tile was the expected one.
    Success(u32),
    /// The tapped tile was out of order.
    Failure(u32),
    /// The grid was completed.
    Win,
}

impl Feedback {
    /// Tile value that triggered the cue, if any.
    pub fn value(self) -> Option<u32> {
        match self {
            Feedback::Success(value) | Feedback::Failure(value) => Some(value),
            Feedback::Win => None,
        }
    }
}

/// Receives feedback cues, e.g. to drive haptics or sounds on a device.
pub trait FeedbackSink: Send + Sync {
    /// Deliver one cue. Must not block.
    fn signal(&self, feedback: Feedback);
}

/// Sink that only records cues in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn signal(&self, feedback: Feedback) {
        debug!(?feedback, "feedback");
    }
}
