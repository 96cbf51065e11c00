//! Core type definitions used across the RSVP workspace.

pub mod id;

pub use id::*;
