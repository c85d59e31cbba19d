//! Data models for products and transfer slips

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::audit::StockMove;
use crate::core_types::{BranchId, MoveReason, ProductId, SlipId, StaffId};
use crate::slip_token;

use super::status::SlipStatus;

/// Default page size for slip listings
pub const DEFAULT_SLIP_LIMIT: usize = 100;
/// Hard cap on one listing page
pub const MAX_SLIP_LIMIT: usize = 1000;

/// A tracked product.
///
/// `quantity` is the total units owned; `current_branch` is the last
/// known location. Both are mutated only through ledger transactions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(value_type = String, example = "01JGN3W2E8H4K6M0P2R4T6V8X0")]
    pub id: ProductId,
    #[schema(example = "Espresso Grinder MK4")]
    pub name: String,
    #[schema(example = "EG-MK4-0017")]
    pub sku: String,
    /// Total units owned. Units on an in-transit slip are debited from
    /// this count until the slip resolves.
    pub quantity: u32,
    /// Last known location
    #[schema(value_type = String)]
    pub current_branch: BranchId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Register a new product holding its opening quantity at a branch
    pub fn new(name: String, sku: String, quantity: u32, current_branch: BranchId) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name,
            sku,
            quantity,
            current_branch,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A transfer slip: one movement of a quantity of one product between
/// two branches.
///
/// Created at initiation, mutated exactly once more at receipt or
/// cancellation, never deleted. The product name is snapshotted so the
/// slip stays meaningful if the catalog entry is later renamed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferSlip {
    #[schema(value_type = String, example = "01JGN4A7C9E1G3J5L7N9Q1S3V5")]
    pub id: SlipId,
    /// Short human-readable reference, for spoken or written use
    #[schema(example = "TS-250825-Q1S3V5")]
    pub code: String,
    /// Portable scannable token (see the slip token codec)
    #[schema(example = "ST1AZT3xkwzUmVp8cXN2YQhK0aWw9pTc")]
    pub token: String,
    #[schema(value_type = String)]
    pub product_id: ProductId,
    /// Product name at initiation time
    #[schema(example = "Espresso Grinder MK4")]
    pub product_name: String,
    pub quantity: u32,
    #[schema(value_type = String)]
    pub from_branch: BranchId,
    #[schema(value_type = String)]
    pub to_branch: BranchId,
    #[schema(value_type = String)]
    pub initiator_staff_id: StaffId,
    pub initiated_at: DateTime<Utc>,
    pub status: SlipStatus,
    /// Set on receipt, never on cancellation
    #[schema(value_type = Option<String>)]
    pub receiver_staff_id: Option<StaffId>,
    pub received_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl TransferSlip {
    /// Materialize the slip from an initiation spec plus the product name
    /// snapshot read inside the same transaction.
    pub fn from_spec(spec: &InitiateSpec, product_name: String) -> Self {
        Self {
            id: spec.slip_id,
            code: spec.code.clone(),
            token: spec.token.clone(),
            product_id: spec.product_id,
            product_name,
            quantity: spec.quantity,
            from_branch: spec.from_branch,
            to_branch: spec.to_branch,
            initiator_staff_id: spec.initiator_staff_id,
            initiated_at: spec.initiated_at,
            status: SlipStatus::InTransit,
            receiver_staff_id: None,
            received_at: None,
            notes: spec.notes.clone(),
        }
    }

    /// Audit movement for the initiation decrement
    pub fn departure_move(&self) -> StockMove {
        self.slip_move(MoveReason::TransferInitiated, self.initiator_staff_id, self.initiated_at)
    }

    /// Audit movement for the receipt credit
    pub fn arrival_move(&self, receiver: StaffId, at: DateTime<Utc>) -> StockMove {
        self.slip_move(MoveReason::TransferComplete, receiver, at)
    }

    /// Audit movement for the cancellation restore
    pub fn return_move(&self, actor: StaffId, at: DateTime<Utc>) -> StockMove {
        self.slip_move(MoveReason::TransferCancelled, actor, at)
    }

    // Slip movements always carry the slip's own endpoints; the reason
    // tells the story.
    fn slip_move(&self, reason: MoveReason, staff_id: StaffId, at: DateTime<Utc>) -> StockMove {
        StockMove {
            product_id: self.product_id,
            from_branch: Some(self.from_branch),
            to_branch: Some(self.to_branch),
            quantity: self.quantity,
            reason,
            slip_id: Some(self.id),
            staff_id,
            recorded_at: at,
        }
    }
}

/// Parameters for initiating a transfer, as received from the caller
#[derive(Debug, Clone)]
pub struct InitiateRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub from_branch: BranchId,
    pub to_branch: BranchId,
    pub initiator_staff_id: StaffId,
    pub pin: String,
    pub notes: Option<String>,
}

/// Fully validated initiation handed to the store for the atomic step.
///
/// Identity, code, and token are fixed before the transaction begins so
/// both storage backends persist the same record.
#[derive(Debug, Clone)]
pub struct InitiateSpec {
    pub slip_id: SlipId,
    pub code: String,
    pub token: String,
    pub product_id: ProductId,
    pub quantity: u32,
    pub from_branch: BranchId,
    pub to_branch: BranchId,
    pub initiator_staff_id: StaffId,
    pub initiated_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl InitiateSpec {
    pub fn new(
        product_id: ProductId,
        quantity: u32,
        from_branch: BranchId,
        to_branch: BranchId,
        initiator_staff_id: StaffId,
        notes: Option<String>,
    ) -> Self {
        let slip_id = SlipId::new();
        let initiated_at = Utc::now();
        Self {
            slip_id,
            code: derive_code(slip_id, initiated_at),
            token: slip_token::encode(slip_id),
            product_id,
            quantity,
            from_branch,
            to_branch,
            initiator_staff_id,
            initiated_at,
            notes,
        }
    }
}

/// Derive the human-readable slip code from the id and initiation date,
/// e.g. `TS-250825-Q1S3V5`.
fn derive_code(slip_id: SlipId, initiated_at: DateTime<Utc>) -> String {
    let id_str = slip_id.to_string();
    // Last six characters of the ULID are the tail of its random part
    let suffix = &id_str[id_str.len() - 6..];
    format!("TS-{}-{}", initiated_at.format("%y%m%d"), suffix)
}

/// Filter for slip listings. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct SlipFilter {
    pub status: Option<SlipStatus>,
    /// Matches slips touching this branch as origin or destination
    pub branch: Option<BranchId>,
    pub product_id: Option<ProductId>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SlipFilter {
    /// Page size with default and hard cap applied
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SLIP_LIMIT).min(MAX_SLIP_LIMIT)
    }

    /// Filter predicate shared by the in-process store
    pub fn matches(&self, slip: &TransferSlip) -> bool {
        if let Some(status) = self.status {
            if slip.status != status {
                return false;
            }
        }
        if let Some(branch) = self.branch {
            if slip.from_branch != branch && slip.to_branch != branch {
                return false;
            }
        }
        if let Some(product_id) = self.product_id {
            if slip.product_id != product_id {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip_token;

    fn spec() -> InitiateSpec {
        InitiateSpec::new(
            ProductId::new(),
            4,
            BranchId::new(),
            BranchId::new(),
            StaffId::new(),
            Some("fragile".to_string()),
        )
    }

    #[test]
    fn test_slip_from_spec() {
        let spec = spec();
        let slip = TransferSlip::from_spec(&spec, "Espresso Grinder MK4".to_string());

        assert_eq!(slip.id, spec.slip_id);
        assert_eq!(slip.status, SlipStatus::InTransit);
        assert_eq!(slip.product_name, "Espresso Grinder MK4");
        assert_eq!(slip.quantity, 4);
        assert!(slip.receiver_staff_id.is_none());
        assert!(slip.received_at.is_none());
        assert_eq!(slip.notes.as_deref(), Some("fragile"));
    }

    #[test]
    fn test_token_resolves_back_to_slip_id() {
        let spec = spec();
        assert_eq!(slip_token::decode(&spec.token).unwrap(), spec.slip_id);
    }

    #[test]
    fn test_code_format() {
        let spec = spec();
        let parts: Vec<&str> = spec.code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TS");
        assert_eq!(parts[1].len(), 6);
        assert!(parts[1].bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        // Suffix comes from the slip id
        assert!(spec.slip_id.to_string().ends_with(parts[2]));
    }

    #[test]
    fn test_slip_moves_carry_slip_endpoints() {
        let spec = spec();
        let slip = TransferSlip::from_spec(&spec, "P".to_string());

        let departure = slip.departure_move();
        assert_eq!(departure.reason, MoveReason::TransferInitiated);
        assert_eq!(departure.from_branch, Some(slip.from_branch));
        assert_eq!(departure.to_branch, Some(slip.to_branch));
        assert_eq!(departure.staff_id, slip.initiator_staff_id);
        assert_eq!(departure.slip_id, Some(slip.id));

        let receiver = StaffId::new();
        let arrival = slip.arrival_move(receiver, Utc::now());
        assert_eq!(arrival.reason, MoveReason::TransferComplete);
        assert_eq!(arrival.staff_id, receiver);
        assert_eq!(arrival.from_branch, Some(slip.from_branch));
        assert_eq!(arrival.to_branch, Some(slip.to_branch));

        let canceller = StaffId::new();
        let restore = slip.return_move(canceller, Utc::now());
        assert_eq!(restore.reason, MoveReason::TransferCancelled);
        assert_eq!(restore.staff_id, canceller);
        assert_eq!(restore.quantity, slip.quantity);
    }

    #[test]
    fn test_filter_matches() {
        let spec = spec();
        let slip = TransferSlip::from_spec(&spec, "P".to_string());

        assert!(SlipFilter::default().matches(&slip));

        let by_status = SlipFilter {
            status: Some(SlipStatus::InTransit),
            ..Default::default()
        };
        assert!(by_status.matches(&slip));

        let by_terminal = SlipFilter {
            status: Some(SlipStatus::Completed),
            ..Default::default()
        };
        assert!(!by_terminal.matches(&slip));

        let by_origin = SlipFilter {
            branch: Some(slip.from_branch),
            ..Default::default()
        };
        assert!(by_origin.matches(&slip));

        let by_dest = SlipFilter {
            branch: Some(slip.to_branch),
            ..Default::default()
        };
        assert!(by_dest.matches(&slip));

        let by_other = SlipFilter {
            branch: Some(BranchId::new()),
            ..Default::default()
        };
        assert!(!by_other.matches(&slip));

        let by_product = SlipFilter {
            product_id: Some(slip.product_id),
            ..Default::default()
        };
        assert!(by_product.matches(&slip));
    }

    #[test]
    fn test_filter_limit_clamp() {
        assert_eq!(SlipFilter::default().effective_limit(), DEFAULT_SLIP_LIMIT);
        assert_eq!(
            SlipFilter {
                limit: Some(usize::MAX),
                ..Default::default()
            }
            .effective_limit(),
            MAX_SLIP_LIMIT
        );
    }
}
