use serde::{Deserialize, Serialize};

/// Lifecycle status of an appointment. Serialized capitalized on the wire
/// (`"Scheduled"`), matching the clinic API's enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Raised when a status string from outside the wire path doesn't match
/// any known variant.
#[derive(Debug, thiserror::Error)]
#[error("Unknown appointment status: {0}")]
pub struct InvalidStatus(pub String);

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    // ── Action enablement ───────────────────────────────────
    //
    // The single source of truth for which row actions are legal.
    // Cancelled is terminal; Completed may still be edited or cancelled,
    // only Scheduled may be completed.

    /// May this appointment be rescheduled/edited?
    pub fn can_edit(&self) -> bool {
        *self != Self::Cancelled
    }

    /// May this appointment be marked completed?
    pub fn can_complete(&self) -> bool {
        *self == Self::Scheduled
    }

    /// May this appointment be cancelled?
    pub fn can_cancel(&self) -> bool {
        *self != Self::Cancelled
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}
