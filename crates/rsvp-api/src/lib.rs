//! # rsvp-api
//!
//! HTTP API layer for the RSVP service built on Axum.
//!
//! Provides the event and reservation endpoints, the caller-identity
//! extractor, DTOs, error mapping, and the CORS and request-logging
//! middleware.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
