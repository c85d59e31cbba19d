//! Core identifier and enum types used throughout the system.
//!
//! All entity identifiers are ULID newtypes:
//! - Monotonic, sortable IDs
//! - No coordination needed (no machine_id)
//! - 128-bit with good entropy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Branch (location) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(ulid::Ulid);

impl BranchId {
    /// Generate a new unique BranchId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for BranchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BranchId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Staff member identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(ulid::Ulid);

impl StaffId {
    /// Generate a new unique StaffId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for StaffId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StaffId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Product (stock item) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(ulid::Ulid);

impl ProductId {
    /// Generate a new unique ProductId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Transfer slip identifier.
///
/// Ordered so that slips sort by creation time (ULID timestamp prefix);
/// used as the tie-break when listing slips initiated in the same
/// millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlipId(ulid::Ulid);

impl SlipId {
    /// Generate a new unique SlipId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }

    /// Reconstruct from raw 128-bit value (token decoding)
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(ulid::Ulid::from_bytes(bytes))
    }

    /// Raw 128-bit big-endian bytes (token encoding)
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }
}

impl Default for SlipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SlipId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Staff role for authorization checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum StaffRole {
    /// Regular branch staff
    Staff = 1,
    /// Branch manager (may cancel any slip, adjust stock)
    Manager = 2,
    /// Administrator (full access, may register branches/staff/products)
    Admin = 3,
}

impl StaffRole {
    /// Get numeric ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(StaffRole::Staff),
            2 => Some(StaffRole::Manager),
            3 => Some(StaffRole::Admin),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Staff => "staff",
            StaffRole::Manager => "manager",
            StaffRole::Admin => "admin",
        }
    }

    /// Manager-level privileges (manager or admin)
    #[inline]
    pub fn is_manager(&self) -> bool {
        matches!(self, StaffRole::Manager | StaffRole::Admin)
    }

    /// Admin privileges
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for StaffRole {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        StaffRole::from_id(value).ok_or(())
    }
}

/// Reason attached to every stock movement in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum MoveReason {
    /// Stock left the origin branch on an outbound slip
    TransferInitiated = 1,
    /// Stock arrived at the destination branch
    TransferComplete = 2,
    /// Stock returned to the origin branch after cancellation
    TransferCancelled = 3,
    /// Opening quantity recorded at product registration
    InitialStock = 4,
    /// Manual stock correction
    Adjustment = 5,
}

impl MoveReason {
    /// Get numeric ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(MoveReason::TransferInitiated),
            2 => Some(MoveReason::TransferComplete),
            3 => Some(MoveReason::TransferCancelled),
            4 => Some(MoveReason::InitialStock),
            5 => Some(MoveReason::Adjustment),
            _ => None,
        }
    }

    /// Get snake_case name as written to the audit trail
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveReason::TransferInitiated => "transfer_initiated",
            MoveReason::TransferComplete => "transfer_complete",
            MoveReason::TransferCancelled => "transfer_cancelled",
            MoveReason::InitialStock => "initial_stock",
            MoveReason::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for MoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for MoveReason {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        MoveReason::from_id(value).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slip_id_roundtrip_bytes() {
        let id = SlipId::new();
        let bytes = id.to_bytes();
        assert_eq!(SlipId::from_bytes(bytes), id);
    }

    #[test]
    fn test_slip_id_parse() {
        let id = SlipId::new();
        let parsed: SlipId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        assert!("not-a-ulid".parse::<SlipId>().is_err());
    }

    #[test]
    fn test_slip_ids_sort_by_creation() {
        let a = SlipId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = SlipId::new();
        assert!(a < b);
    }

    #[test]
    fn test_staff_role_roundtrip() {
        assert_eq!(StaffRole::from_id(1), Some(StaffRole::Staff));
        assert_eq!(StaffRole::from_id(2), Some(StaffRole::Manager));
        assert_eq!(StaffRole::from_id(3), Some(StaffRole::Admin));
        assert_eq!(StaffRole::from_id(0), None);
        assert_eq!(StaffRole::from_id(4), None);
    }

    #[test]
    fn test_role_privileges() {
        assert!(!StaffRole::Staff.is_manager());
        assert!(StaffRole::Manager.is_manager());
        assert!(StaffRole::Admin.is_manager());

        assert!(!StaffRole::Staff.is_admin());
        assert!(!StaffRole::Manager.is_admin());
        assert!(StaffRole::Admin.is_admin());
    }

    #[test]
    fn test_move_reason_roundtrip() {
        let reasons = [
            MoveReason::TransferInitiated,
            MoveReason::TransferComplete,
            MoveReason::TransferCancelled,
            MoveReason::InitialStock,
            MoveReason::Adjustment,
        ];
        for reason in reasons {
            assert_eq!(MoveReason::from_id(reason.id()), Some(reason));
        }
        assert_eq!(MoveReason::from_id(99), None);
    }

    #[test]
    fn test_move_reason_names() {
        assert_eq!(
            MoveReason::TransferInitiated.to_string(),
            "transfer_initiated"
        );
        assert_eq!(MoveReason::InitialStock.to_string(), "initial_stock");
    }

    #[test]
    fn test_id_serde_as_string() {
        let id = BranchId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: BranchId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
