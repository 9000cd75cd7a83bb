//! Shiftboard engine: HTTP client for the volunteer API and the background
//! runtime that executes the state machine's requests.
mod client;
mod engine;
mod types;

pub use client::{ApiSettings, ReqwestApi, RosterApi, DEFAULT_BASE_URL};
pub use engine::EngineHandle;
pub use types::{ApiError, EngineError, EngineEvent, FailureKind};
