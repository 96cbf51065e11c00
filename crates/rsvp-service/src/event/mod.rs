//! Event lifecycle and reservation listings.

pub mod service;

pub use service::{EventService, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, MIN_CAPACITY};
