/// OpenAPI documentation generation.
pub mod documentation;
/// Feedback cues for taps and wins.
pub mod feedback;
/// Health check service.
pub mod health_service;
/// Hydration and the ordered storage writer.
pub mod persistence;
/// Player preferences.
pub mod preferences_service;
/// Leaderboards, badges, streak and tier views.
pub mod progress_service;
/// Session lifecycle: start, tap, stop, dismiss.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Countdown and clock driver.
pub mod timers;
