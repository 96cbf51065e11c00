//! Event category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use rsvp_core::AppError;

/// Descriptive grouping for an event. Has no effect on reservations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Technology meetups and conferences.
    Tech,
    /// Business and networking events.
    Business,
    /// Social gatherings.
    Social,
    /// Workshops, classes, and lectures.
    Educational,
    /// Sporting events.
    Sports,
    /// Anything else.
    #[default]
    Other,
}

impl EventCategory {
    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Business => "business",
            Self::Social => "social",
            Self::Educational => "educational",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tech" => Ok(Self::Tech),
            "business" => Ok(Self::Business),
            "social" => Ok(Self::Social),
            "educational" => Ok(Self::Educational),
            "sports" => Ok(Self::Sports),
            "other" => Ok(Self::Other),
            _ => Err(AppError::validation(format!(
                "Invalid event category: '{s}'. Expected one of: tech, business, social, educational, sports, other"
            ))),
        }
    }
}
