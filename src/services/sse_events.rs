use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        preferences::PreferencesDto,
        session::{GameSummaryDto, SnapshotDto},
        sse::{CountdownEvent, FeedbackEvent, ServerEvent, TickEvent},
    },
    services::feedback::Feedback,
    state::{SharedState, session::SessionId},
};

const EVENT_SESSION_PHASE: &str = "session.phase";
const EVENT_SESSION_COUNTDOWN: &str = "session.countdown";
const EVENT_SESSION_TICK: &str = "session.tick";
const EVENT_SESSION_FINISHED: &str = "session.finished";
const EVENT_FEEDBACK: &str = "feedback";
const EVENT_PREFERENCES_UPDATED: &str = "preferences.updated";

/// Broadcast the full snapshot after a phase change.
pub fn broadcast_phase(state: &SharedState, snapshot: &SnapshotDto) {
    send_event(state, EVENT_SESSION_PHASE, snapshot);
}

/// Broadcast the countdown value on display.
pub fn broadcast_countdown(state: &SharedState, session_id: SessionId, remaining: u8) {
    let payload = CountdownEvent {
        session_id,
        remaining,
    };
    send_event(state, EVENT_SESSION_COUNTDOWN, &payload);
}

/// Broadcast one clock tick.
pub fn broadcast_tick(state: &SharedState, session_id: SessionId, elapsed: f64) {
    let payload = TickEvent {
        session_id,
        elapsed,
    };
    send_event(state, EVENT_SESSION_TICK, &payload);
}

/// Broadcast the summary of a session that just finished.
pub fn broadcast_finished(state: &SharedState, summary: &GameSummaryDto) {
    send_event(state, EVENT_SESSION_FINISHED, summary);
}

/// Forward a feedback cue to the sink and to SSE clients.
pub fn signal_feedback(state: &SharedState, feedback: Feedback) {
    state.feedback().signal(feedback);
    send_event(state, EVENT_FEEDBACK, &FeedbackEvent::from(feedback));
}

/// Broadcast updated preferences.
pub fn broadcast_preferences(state: &SharedState, preferences: &PreferencesDto) {
    send_event(state, EVENT_PREFERENCES_UPDATED, preferences);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
