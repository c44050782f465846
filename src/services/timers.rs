//! Background driver for the live session: a 1 Hz countdown followed by the
//! 100 ms session clock.
//!
//! The driver is bound to one session id. Each step goes through the engine,
//! which refuses steps for a session that is no longer current or has left
//! the expected phase; the driver exits on the first refusal.

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tracing::{debug, info};

use crate::{
    services::{session_service, sse_events},
    state::{SharedState, clock::TICK_PERIOD, engine::CountdownStep, session::SessionId},
};

/// Delay between countdown values.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Spawn the driver for `session_id`.
pub fn spawn_session_driver(state: SharedState, session_id: SessionId) -> JoinHandle<()> {
    tokio::spawn(async move {
        if run_countdown(&state, session_id).await {
            run_clock(&state, session_id).await;
        }
    })
}

/// Returns `true` once the session became active.
async fn run_countdown(state: &SharedState, session_id: SessionId) -> bool {
    let mut ticker = interval_at(Instant::now() + COUNTDOWN_PERIOD, COUNTDOWN_PERIOD);
    loop {
        ticker.tick().await;

        let stepped = {
            let mut engine = state.engine().await;
            engine
                .advance_countdown(session_id, &mut rand::rng())
                .map(|step| (step, session_service::render(state, &engine)))
        };

        match stepped {
            Some((CountdownStep::Remaining(remaining), snapshot)) => {
                sse_events::broadcast_countdown(state, session_id, remaining);
                sse_events::broadcast_phase(state, &snapshot);
            }
            Some((CountdownStep::Started, snapshot)) => {
                info!(session_id = %session_id, tier = %snapshot.tier.label, "session active");
                sse_events::broadcast_phase(state, &snapshot);
                return true;
            }
            None => {
                debug!(session_id = %session_id, "countdown superseded");
                return false;
            }
        }
    }
}

async fn run_clock(state: &SharedState, session_id: SessionId) {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;

        let Some(elapsed) = state.engine().await.tick(session_id) else {
            debug!(session_id = %session_id, "clock stopped");
            return;
        };
        sse_events::broadcast_tick(state, session_id, elapsed);
    }
}
