//! # paylockr-api
//!
//! HTTP layer for PayLockr built on Axum.
//!
//! Routes, handlers, DTOs, and the mapping from domain errors to HTTP
//! status codes. The router is a pure function of [`AppState`], so tests
//! drive it in-process with the in-memory stores and the mock gateway.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::build_state;
pub use router::build_router;
pub use state::AppState;
