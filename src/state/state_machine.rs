use thiserror::Error;

/// Number of one-second countdown steps shown before a session becomes active.
pub const COUNTDOWN_START: u8 = 3;

/// High-level phases a play-through can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session is running; a new one may be requested.
    Idle,
    /// Pre-game countdown, carrying the value currently displayed (3, 2, 1).
    CountingDown(u8),
    /// Tiles are live and the clock is running.
    Active,
    /// The session ended; the outcome is fixed until the next start.
    Finished(Outcome),
}

/// How an active session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The last tile was tapped in order.
    Won,
    /// The player stopped the session early.
    Aborted,
}

/// Events that can be applied to the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new session was requested (regular or daily).
    Start,
    /// One second of countdown elapsed.
    CountdownTick,
    /// The winning tap was submitted.
    Win,
    /// The player stopped the running session.
    Stop,
    /// The summary was closed and the machine returns to idle.
    Dismiss,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

/// State machine implementing the session lifecycle
/// `Idle -> CountingDown -> Active -> Finished -> Idle`.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: SessionPhase,
    version: usize,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            version: 0,
        }
    }
}

impl SessionStateMachine {
    /// Create a new state machine initialised in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Apply `event`, moving to the next phase when the transition is valid.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    /// Validate `event` against the current phase without applying it.
    pub fn can_apply(&self, event: SessionEvent) -> bool {
        self.compute_transition(event).is_ok()
    }

    fn compute_transition(&self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (SessionPhase::Idle | SessionPhase::Finished(_), SessionEvent::Start) => {
                SessionPhase::CountingDown(COUNTDOWN_START)
            }
            (SessionPhase::CountingDown(remaining), SessionEvent::CountdownTick) => {
                if remaining > 1 {
                    SessionPhase::CountingDown(remaining - 1)
                } else {
                    SessionPhase::Active
                }
            }
            (SessionPhase::Active, SessionEvent::Win) => SessionPhase::Finished(Outcome::Won),
            (SessionPhase::Active, SessionEvent::Stop) => SessionPhase::Finished(Outcome::Aborted),
            (SessionPhase::Finished(_), SessionEvent::Dismiss) => SessionPhase::Idle,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut SessionStateMachine, event: SessionEvent) -> SessionPhase {
        sm.apply(event).unwrap()
    }

    #[test]
    fn initial_state_is_idle() {
        let sm = SessionStateMachine::new();
        assert_eq!(sm.phase(), SessionPhase::Idle);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn full_happy_path_through_session() {
        let mut sm = SessionStateMachine::new();

        assert_eq!(
            apply(&mut sm, SessionEvent::Start),
            SessionPhase::CountingDown(3)
        );
        assert_eq!(
            apply(&mut sm, SessionEvent::CountdownTick),
            SessionPhase::CountingDown(2)
        );
        assert_eq!(
            apply(&mut sm, SessionEvent::CountdownTick),
            SessionPhase::CountingDown(1)
        );
        assert_eq!(
            apply(&mut sm, SessionEvent::CountdownTick),
            SessionPhase::Active
        );
        assert_eq!(
            apply(&mut sm, SessionEvent::Win),
            SessionPhase::Finished(Outcome::Won)
        );
        assert_eq!(apply(&mut sm, SessionEvent::Dismiss), SessionPhase::Idle);
        assert_eq!(sm.version(), 6);
    }

    #[test]
    fn stop_only_from_active() {
        let mut sm = SessionStateMachine::new();
        assert!(sm.apply(SessionEvent::Stop).is_err());

        apply(&mut sm, SessionEvent::Start);
        let err = sm.apply(SessionEvent::Stop).unwrap_err();
        assert_eq!(err.from, SessionPhase::CountingDown(3));
        assert_eq!(err.event, SessionEvent::Stop);

        for _ in 0..3 {
            apply(&mut sm, SessionEvent::CountdownTick);
        }
        assert_eq!(
            apply(&mut sm, SessionEvent::Stop),
            SessionPhase::Finished(Outcome::Aborted)
        );
    }

    #[test]
    fn restart_allowed_from_finished_but_not_while_running() {
        let mut sm = SessionStateMachine::new();
        apply(&mut sm, SessionEvent::Start);
        assert!(!sm.can_apply(SessionEvent::Start));
        for _ in 0..3 {
            apply(&mut sm, SessionEvent::CountdownTick);
        }
        assert!(!sm.can_apply(SessionEvent::Start));
        apply(&mut sm, SessionEvent::Win);
        assert_eq!(
            apply(&mut sm, SessionEvent::Start),
            SessionPhase::CountingDown(3)
        );
    }

    #[test]
    fn invalid_transition_leaves_phase_untouched() {
        let mut sm = SessionStateMachine::new();
        let err = sm.apply(SessionEvent::Win).unwrap_err();
        assert_eq!(err.from, SessionPhase::Idle);
        assert_eq!(sm.phase(), SessionPhase::Idle);
        assert_eq!(sm.version(), 0);
    }
}
