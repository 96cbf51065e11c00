//! Event domain entities.

pub mod category;
pub mod ledger;
pub mod model;

pub use category::EventCategory;
pub use ledger::SeatLedger;
pub use model::{Event, EventUpdate, NewEvent};
