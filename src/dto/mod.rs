//! Serde and OpenAPI wire types.

pub mod health;
pub mod preferences;
pub mod progress;
pub mod session;
pub mod sse;
