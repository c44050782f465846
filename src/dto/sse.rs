use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::feedback::Feedback;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// Serialised payload.
    pub data: String,
}

impl ServerEvent {
    /// Plain-text event.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast once per second while a session counts down.
pub struct CountdownEvent {
    /// Session counting down.
    pub session_id: Uuid,
    /// Value on display.
    pub remaining: u8,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast on every clock tick of an active session.
pub struct TickEvent {
    /// Session being timed.
    pub session_id: Uuid,
    /// Elapsed seconds.
    pub elapsed: f64,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
/// Kind of feedback cue.
pub enum FeedbackKind {
    /// Correct tap.
    Success,
    /// Wrong tap.
    Failure,
    /// Grid completed.
    Win,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast for every feedback cue.
pub struct FeedbackEvent {
    /// Cue kind.
    pub kind: FeedbackKind,
    /// Tapped value, absent for wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl From<Feedback> for FeedbackEvent {
    fn from(feedback: Feedback) -> Self {
        let kind = match feedback {
            Feedback::Success(_) => FeedbackKind::Success,
            Feedback::Failure(_) => FeedbackKind::Failure,
            Feedback::Win => FeedbackKind::Win,
        };
        Self {
            kind,
            value: feedback.value(),
        }
    }
}
