//! Session lifecycle operations exposed to the presentation layer.
//!
//! Requests that do not apply in the current phase (starting while a session
//! runs, stopping while idle, ...) are not errors: they leave the engine
//! untouched and return the current snapshot.

use tokio::sync::MutexGuard;
use tracing::{debug, info};

use crate::{
    dto::session::{GameSummaryDto, SessionOutcome, SnapshotDto, TapResponse},
    error::ServiceError,
    services::{feedback::Feedback, sse_events, timers},
    state::{
        SharedState,
        daily::DailyChallenge,
        engine::{GameEngine, TapOutcome},
        session::GameResult,
        tier::DifficultyTier,
    },
};

/// Render the engine state for the wire.
pub(crate) fn render(state: &SharedState, engine: &GameEngine) -> SnapshotDto {
    engine.snapshot(state.daily_challenge()).into()
}

/// Current snapshot.
pub async fn snapshot(state: &SharedState) -> SnapshotDto {
    let engine = state.engine().await;
    render(state, &engine)
}

/// Start a session on the configured tier named `label`.
pub async fn start_session(state: &SharedState, label: &str) -> Result<SnapshotDto, ServiceError> {
    let label = label.trim();
    let engine = state.engine().await;
    let tier = engine
        .tier(label)
        .cloned()
        .ok_or_else(|| ServiceError::UnknownTier(label.to_string()))?;
    Ok(start(state, engine, tier, None).await)
}

/// Start today's daily challenge.
pub async fn start_daily(state: &SharedState) -> SnapshotDto {
    let challenge = state.daily_challenge();
    let engine = state.engine().await;
    let tier = DifficultyTier::daily(challenge.grid_size);
    start(state, engine, tier, Some(challenge)).await
}

async fn start(
    state: &SharedState,
    mut engine: MutexGuard<'_, GameEngine>,
    tier: DifficultyTier,
    daily: Option<DailyChallenge>,
) -> SnapshotDto {
    let session_id = match engine.request_start(tier, daily) {
        Ok(session_id) => session_id,
        Err(err) => {
            debug!(error = %err, "start ignored");
            return render(state, &engine);
        }
    };

    state
        .replace_session_driver(timers::spawn_session_driver(state.clone(), session_id))
        .await;
    let snapshot = render(state, &engine);
    drop(engine);

    info!(
        session_id = %session_id,
        tier = %snapshot.tier.label,
        daily = snapshot.is_daily,
        "countdown started"
    );
    sse_events::broadcast_phase(state, &snapshot);
    snapshot
}

/// Handle a tile tap.
pub async fn tap(state: &SharedState, value: u32) -> TapResponse {
    let mut engine = state.engine().await;
    let outcome = engine.submit_tap(value);

    let finished = match &outcome {
        TapOutcome::Ignored => {
            debug!(value, "tap ignored outside an active session");
            None
        }
        TapOutcome::Wrong { expected, .. } => {
            debug!(value, expected, "wrong tap");
            sse_events::signal_feedback(state, Feedback::Failure(value));
            None
        }
        TapOutcome::Correct { .. } => {
            sse_events::signal_feedback(state, Feedback::Success(value));
            None
        }
        TapOutcome::Won(report) => {
            sse_events::signal_feedback(state, Feedback::Success(value));
            state.cancel_session_driver().await;
            state.persistence().submit(report.writes.clone());
            info!(
                session_id = %report.result.session_id,
                tier = %report.result.tier_label,
                time = ?report.result.time,
                new_high_score = report.result.new_high_score,
                "session won"
            );
            sse_events::signal_feedback(state, Feedback::Win);
            Some(summarize(state, &report.result))
        }
    };

    let snapshot = render(state, &engine);
    drop(engine);

    if let Some(summary) = finished {
        sse_events::broadcast_phase(state, &snapshot);
        sse_events::broadcast_finished(state, &summary);
    }

    TapResponse {
        result: (&outcome).into(),
        snapshot,
    }
}

/// Abort the active session without recording anything.
pub async fn stop(state: &SharedState) -> SnapshotDto {
    let mut engine = state.engine().await;
    let result = match engine.request_stop() {
        Ok(result) => result,
        Err(err) => {
            debug!(error = %err, "stop ignored");
            return render(state, &engine);
        }
    };

    state.cancel_session_driver().await;
    let snapshot = render(state, &engine);
    drop(engine);

    info!(session_id = %result.session_id, "session aborted");
    sse_events::broadcast_phase(state, &snapshot);
    sse_events::broadcast_finished(state, &summarize(state, &result));
    snapshot
}

/// Close the summary of a finished session.
pub async fn dismiss(state: &SharedState) -> SnapshotDto {
    let mut engine = state.engine().await;
    if let Err(err) = engine.dismiss() {
        debug!(error = %err, "dismiss ignored");
        return render(state, &engine);
    }

    state.cancel_session_driver().await;
    let snapshot = render(state, &engine);
    drop(engine);

    sse_events::broadcast_phase(state, &snapshot);
    snapshot
}

/// Summary of the last finished session.
pub async fn summary(state: &SharedState) -> Result<GameSummaryDto, ServiceError> {
    let result = state
        .engine()
        .await
        .last_result()
        .cloned()
        .ok_or(ServiceError::NoFinishedSession)?;
    Ok(summarize(state, &result))
}

fn summarize(state: &SharedState, result: &GameResult) -> GameSummaryDto {
    let fun_fact = state
        .config()
        .random_fun_fact(&mut rand::rng())
        .map(str::to_string);

    GameSummaryDto {
        session_id: result.session_id,
        nickname: state.preferences().nickname,
        tier: result.tier_label.clone(),
        time: result.time,
        outcome: if result.is_aborted() {
            SessionOutcome::Aborted
        } else {
            SessionOutcome::Won
        },
        is_daily: result.daily.is_some(),
        daily_goal: result.daily.as_ref().map(|daily| daily.goal_seconds),
        daily_goal_met: result.daily_goal_met(),
        is_high_score: result.new_high_score,
        rank: result.rank,
        unlocked_badges: result
            .unlocked
            .iter()
            .map(|badge| badge.id().to_string())
            .collect(),
        streak: result.streak,
        fun_fact,
        share_text: result.share_text(),
    }
}
