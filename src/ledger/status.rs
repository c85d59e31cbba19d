//! Slip status definitions
//!
//! Status IDs are designed for PostgreSQL storage as SMALLINT.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Transfer slip states
///
/// `in_transit` is the only initial and only non-terminal state. The two
/// legal transitions are `in_transit -> completed` and
/// `in_transit -> cancelled`; terminal slips are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum SlipStatus {
    /// Stock debited from the origin, not yet credited anywhere
    InTransit = 1,

    /// Terminal: received at the destination branch
    Completed = 2,

    /// Terminal: voided before receipt, stock restored to the origin
    Cancelled = 3,
}

impl SlipStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlipStatus::Completed | SlipStatus::Cancelled)
    }

    /// Get the numeric state ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL state ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(SlipStatus::InTransit),
            2 => Some(SlipStatus::Completed),
            3 => Some(SlipStatus::Cancelled),
            _ => None,
        }
    }

    /// Get snake_case name as surfaced through the API
    pub fn as_str(&self) -> &'static str {
        match self {
            SlipStatus::InTransit => "in_transit",
            SlipStatus::Completed => "completed",
            SlipStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SlipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for SlipStatus {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        SlipStatus::from_id(value).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SlipStatus::InTransit.is_terminal());
        assert!(SlipStatus::Completed.is_terminal());
        assert!(SlipStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_id_roundtrip() {
        let states = [
            SlipStatus::InTransit,
            SlipStatus::Completed,
            SlipStatus::Cancelled,
        ];
        for state in states {
            let id = state.id();
            let recovered = SlipStatus::from_id(id).unwrap();
            assert_eq!(state, recovered);
        }
    }

    #[test]
    fn test_invalid_status_id() {
        assert!(SlipStatus::from_id(0).is_none());
        assert!(SlipStatus::from_id(99).is_none());
        assert!(SlipStatus::from_id(-1).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(SlipStatus::InTransit.to_string(), "in_transit");
        assert_eq!(SlipStatus::Completed.to_string(), "completed");
        assert_eq!(SlipStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&SlipStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
        let back: SlipStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, SlipStatus::Cancelled);
    }
}
