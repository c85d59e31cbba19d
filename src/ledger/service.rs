//! Transfer ledger service
//!
//! Orchestrates the transfer workflow over the storage seam. The
//! service owns caller-facing precondition checks (field validation,
//! PIN, role and branch authorization); the store re-checks everything
//! that depends on stored state inside its transaction, so a stale
//! fast-path read can never corrupt stock.

use std::sync::Arc;

use tracing::{debug, info};

use crate::branch::{Branch, BranchRegistry};
use crate::core_types::{BranchId, ProductId, SlipId, StaffId};
use crate::error::{TransitError, TransitResult};
use crate::slip_token;
use crate::staff::StaffDirectory;
use crate::store::LedgerStore;

use super::models::{InitiateRequest, InitiateSpec, Product, SlipFilter, TransferSlip};
use super::status::SlipStatus;

const MAX_PRODUCT_NAME_LEN: usize = 200;
const MAX_SKU_LEN: usize = 64;
const MAX_NOTES_LEN: usize = 500;

/// Transfer workflow service
pub struct TransferLedger {
    store: Arc<dyn LedgerStore>,
    directory: Arc<StaffDirectory>,
    registry: Arc<BranchRegistry>,
}

impl TransferLedger {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        directory: Arc<StaffDirectory>,
        registry: Arc<BranchRegistry>,
    ) -> Self {
        Self {
            store,
            directory,
            registry,
        }
    }

    /// Start a transfer: debit the product and issue an in-transit slip.
    ///
    /// Precondition failures surface in a fixed order so callers always
    /// see the same error for the same bad input: endpoint validation,
    /// then quantity, then PIN, then branch affinity, then endpoint
    /// lookup. Stock sufficiency is only decided inside the atomic step.
    pub async fn initiate_transfer(&self, req: InitiateRequest) -> TransitResult<TransferSlip> {
        if req.from_branch == req.to_branch {
            return Err(TransitError::Validation(
                "origin and destination branch must differ".to_string(),
            ));
        }
        if req.quantity < 1 {
            return Err(TransitError::Validation(
                "transfer quantity must be at least 1".to_string(),
            ));
        }
        let notes = validate_notes(req.notes)?;

        let initiator = self
            .directory
            .authenticate(req.initiator_staff_id, &req.pin)
            .await?;

        if initiator.branch_id != req.from_branch {
            return Err(TransitError::NotAuthorized(format!(
                "initiator works at branch {}, not origin branch {}",
                initiator.branch_id, req.from_branch
            )));
        }

        self.require_active_branch(req.from_branch).await?;
        self.require_active_branch(req.to_branch).await?;

        let spec = InitiateSpec::new(
            req.product_id,
            req.quantity,
            req.from_branch,
            req.to_branch,
            req.initiator_staff_id,
            notes,
        );
        let slip = self.store.initiate_transfer(&spec).await?;

        info!(
            slip_id = %slip.id,
            code = %slip.code,
            product_id = %slip.product_id,
            quantity = slip.quantity,
            "Transfer initiated: {} -> {}",
            slip.from_branch,
            slip.to_branch
        );
        Ok(slip)
    }

    /// Complete a transfer at the destination branch.
    pub async fn receive_transfer(
        &self,
        slip_id: SlipId,
        receiver_staff_id: StaffId,
        pin: &str,
    ) -> TransitResult<TransferSlip> {
        let slip = self.get_slip(slip_id).await?;
        if slip.status != SlipStatus::InTransit {
            return Err(TransitError::InvalidState {
                slip_id,
                status: slip.status,
            });
        }

        let receiver = self
            .directory
            .authenticate(receiver_staff_id, pin)
            .await?;

        if receiver.branch_id != slip.to_branch {
            return Err(TransitError::NotAuthorized(format!(
                "receiver works at branch {}, not destination branch {}",
                receiver.branch_id, slip.to_branch
            )));
        }

        // The store re-checks the status against the locked row, so a
        // racing receive or cancel loses cleanly here.
        let slip = self.store.receive_transfer(slip_id, receiver_staff_id).await?;

        info!(
            slip_id = %slip.id,
            code = %slip.code,
            receiver = %receiver_staff_id,
            "📦 Transfer completed at {}",
            slip.to_branch
        );
        Ok(slip)
    }

    /// Cancel an in-transit transfer and restore the origin's stock.
    ///
    /// Allowed for the initiator and for managers and admins. The
    /// authorization check runs before the PIN so an unauthorized
    /// caller learns nothing about their own PIN state.
    pub async fn cancel_transfer(
        &self,
        slip_id: SlipId,
        actor_staff_id: StaffId,
        pin: &str,
    ) -> TransitResult<TransferSlip> {
        let slip = self.get_slip(slip_id).await?;
        if slip.status != SlipStatus::InTransit {
            return Err(TransitError::InvalidState {
                slip_id,
                status: slip.status,
            });
        }

        let actor = self.directory.get_profile(actor_staff_id).await?;
        if actor.id != slip.initiator_staff_id && !actor.role.is_manager() {
            return Err(TransitError::NotAuthorized(
                "only the initiator or a manager may cancel a transfer".to_string(),
            ));
        }

        self.directory.authenticate(actor_staff_id, pin).await?;

        let slip = self.store.cancel_transfer(slip_id, actor_staff_id).await?;

        info!(
            slip_id = %slip.id,
            code = %slip.code,
            actor = %actor_staff_id,
            "Transfer cancelled, stock restored to {}",
            slip.from_branch
        );
        Ok(slip)
    }

    /// Look up a slip from a scanned token. Resolves slips in any
    /// status; the caller decides what a terminal status means for it.
    pub async fn resolve_slip_by_token(&self, token: &str) -> TransitResult<TransferSlip> {
        let slip_id = slip_token::decode(token)?;
        debug!(slip_id = %slip_id, "Resolved slip token");
        self.get_slip(slip_id).await
    }

    pub async fn get_slip(&self, slip_id: SlipId) -> TransitResult<TransferSlip> {
        self.store
            .get_slip(slip_id)
            .await?
            .ok_or(TransitError::NotFound {
                kind: "slip",
                id: slip_id.to_string(),
            })
    }

    /// Slips matching the filter, most recently initiated first
    pub async fn list_slips(&self, filter: &SlipFilter) -> TransitResult<Vec<TransferSlip>> {
        self.store.list_slips(filter).await
    }

    /// Register a product with its opening stock. Admin only.
    ///
    /// Zero opening quantity is allowed for catalog entries created
    /// ahead of their first delivery.
    pub async fn register_stock(
        &self,
        name: &str,
        sku: &str,
        quantity: u32,
        branch_id: BranchId,
        staff_id: StaffId,
        pin: &str,
    ) -> TransitResult<Product> {
        let name = validate_product_name(name)?;
        let sku = validate_sku(sku)?;

        let actor = self.directory.authenticate(staff_id, pin).await?;
        if !actor.role.is_admin() {
            return Err(TransitError::NotAuthorized(
                "product registration requires admin role".to_string(),
            ));
        }

        self.require_active_branch(branch_id).await?;

        let product = Product::new(name, sku, quantity, branch_id);
        self.store.register_product(&product, staff_id).await?;

        info!(
            product_id = %product.id,
            sku = %product.sku,
            quantity = product.quantity,
            "Product registered at {}",
            branch_id
        );
        Ok(product)
    }

    /// Apply a signed stock correction. Managers and admins only;
    /// managers are further confined to their own branch by the store.
    pub async fn adjust_stock(
        &self,
        product_id: ProductId,
        delta: i64,
        staff_id: StaffId,
        pin: &str,
    ) -> TransitResult<Product> {
        if delta == 0 {
            return Err(TransitError::Validation(
                "adjustment delta must be non-zero".to_string(),
            ));
        }

        let actor = self.directory.authenticate(staff_id, pin).await?;
        if !actor.role.is_manager() {
            return Err(TransitError::NotAuthorized(
                "stock adjustment requires manager or admin role".to_string(),
            ));
        }

        let product = self.store.adjust_stock(product_id, delta, &actor).await?;

        info!(
            product_id = %product.id,
            delta,
            quantity = product.quantity,
            actor = %staff_id,
            "Stock adjusted"
        );
        Ok(product)
    }

    pub async fn get_product(&self, product_id: ProductId) -> TransitResult<Product> {
        self.store
            .get_product(product_id)
            .await?
            .ok_or(TransitError::NotFound {
                kind: "product",
                id: product_id.to_string(),
            })
    }

    pub async fn list_products(&self, branch: Option<BranchId>) -> TransitResult<Vec<Product>> {
        self.store.list_products(branch).await
    }

    /// A transfer endpoint must exist and be active; a deactivated
    /// branch is treated as absent.
    async fn require_active_branch(&self, id: BranchId) -> TransitResult<Branch> {
        let branch = self.registry.get_branch(id).await?;
        if !branch.active {
            return Err(TransitError::NotFound {
                kind: "branch",
                id: id.to_string(),
            });
        }
        Ok(branch)
    }
}

fn validate_product_name(name: &str) -> TransitResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TransitError::Validation(
            "product name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_PRODUCT_NAME_LEN {
        return Err(TransitError::Validation(format!(
            "product name too long: {} chars (max {})",
            trimmed.len(),
            MAX_PRODUCT_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_sku(sku: &str) -> TransitResult<String> {
    let trimmed = sku.trim();
    if trimmed.is_empty() {
        return Err(TransitError::Validation(
            "product sku must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_SKU_LEN {
        return Err(TransitError::Validation(format!(
            "product sku too long: {} chars (max {})",
            trimmed.len(),
            MAX_SKU_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_notes(notes: Option<String>) -> TransitResult<Option<String>> {
    match notes {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.len() > MAX_NOTES_LEN {
                return Err(TransitError::Validation(format!(
                    "notes too long: {} chars (max {})",
                    trimmed.len(),
                    MAX_NOTES_LEN
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::StaffRole;
    use crate::store::memory::MemoryStore;

    const ADMIN_PIN: &str = "111111";
    const CLERK_PIN: &str = "222222";
    const RECEIVER_PIN: &str = "333333";
    const MANAGER_PIN: &str = "444444";

    struct Harness {
        ledger: TransferLedger,
        origin: BranchId,
        dest: BranchId,
        admin: StaffId,
        clerk: StaffId,
        receiver: StaffId,
        dest_manager: StaffId,
        product: ProductId,
    }

    impl Harness {
        fn registry(&self) -> &BranchRegistry {
            &self.ledger.registry
        }

        fn initiate_req(&self, quantity: u32, pin: &str) -> InitiateRequest {
            InitiateRequest {
                product_id: self.product,
                quantity,
                from_branch: self.origin,
                to_branch: self.dest,
                initiator_staff_id: self.clerk,
                pin: pin.to_string(),
                notes: None,
            }
        }
    }

    /// Two branches, four staff, one product with 10 units at the origin.
    async fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let registry = Arc::new(BranchRegistry::new(store.clone()));
        let directory = Arc::new(StaffDirectory::new(store.clone(), store.clone()));
        let ledger = TransferLedger::new(store, directory.clone(), registry.clone());

        let origin = registry.create_branch("Origin", "1 First Ave").await.unwrap();
        let dest = registry.create_branch("Destination", "2 Second Ave").await.unwrap();

        let admin = directory
            .create_profile("idp|admin", "Ada Admin", StaffRole::Admin, origin.id, ADMIN_PIN)
            .await
            .unwrap();
        let clerk = directory
            .create_profile("idp|clerk", "Cleo Clerk", StaffRole::Staff, origin.id, CLERK_PIN)
            .await
            .unwrap();
        let receiver = directory
            .create_profile("idp|recv", "Rei Receiver", StaffRole::Staff, dest.id, RECEIVER_PIN)
            .await
            .unwrap();
        let dest_manager = directory
            .create_profile("idp|mgr", "Mina Manager", StaffRole::Manager, dest.id, MANAGER_PIN)
            .await
            .unwrap();

        let product = ledger
            .register_stock("Espresso Grinder MK4", "EG-MK4-0017", 10, origin.id, admin.id, ADMIN_PIN)
            .await
            .unwrap();

        Harness {
            ledger,
            origin: origin.id,
            dest: dest.id,
            admin: admin.id,
            clerk: clerk.id,
            receiver: receiver.id,
            dest_manager: dest_manager.id,
            product: product.id,
        }
    }

    #[tokio::test]
    async fn test_initiate_debits_stock_but_not_location() {
        let h = harness().await;

        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        assert_eq!(slip.status, SlipStatus::InTransit);
        assert_eq!(slip.quantity, 4);
        assert_eq!(slip.product_name, "Espresso Grinder MK4");
        assert!(slip.receiver_staff_id.is_none());
        assert!(slip.code.starts_with("TS-"));
        assert!(slip.token.starts_with("ST1"));

        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 6);
        // Location only moves on receipt
        assert_eq!(product.current_branch, h.origin);
    }

    #[tokio::test]
    async fn test_initiate_same_branch_checked_before_pin() {
        let h = harness().await;
        let mut req = h.initiate_req(4, "000000");
        req.to_branch = h.origin;

        let err = h.ledger.initiate_transfer(req).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_initiate_zero_quantity_checked_before_pin() {
        let h = harness().await;
        let err = h
            .ledger
            .initiate_transfer(h.initiate_req(0, "000000"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_initiate_pin_checked_before_branch_affinity() {
        let h = harness().await;
        // Receiver works at the destination, so affinity would fail,
        // but the bad PIN must be reported first.
        let mut req = h.initiate_req(4, "999999");
        req.initiator_staff_id = h.receiver;

        let err = h.ledger.initiate_transfer(req).await.unwrap_err();
        assert_eq!(err.code(), "PIN_MISMATCH");
    }

    #[tokio::test]
    async fn test_initiate_requires_origin_affinity() {
        let h = harness().await;
        let mut req = h.initiate_req(4, RECEIVER_PIN);
        req.initiator_staff_id = h.receiver;

        let err = h.ledger.initiate_transfer(req).await.unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[tokio::test]
    async fn test_initiate_rejects_inactive_destination() {
        let h = harness().await;
        h.registry().deactivate_branch(h.dest).await.unwrap();

        let err = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 10);
    }

    #[tokio::test]
    async fn test_initiate_insufficient_stock_leaves_no_trace() {
        let h = harness().await;
        let err = h
            .ledger
            .initiate_transfer(h.initiate_req(11, CLERK_PIN))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");

        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 10);
        let slips = h.ledger.list_slips(&SlipFilter::default()).await.unwrap();
        assert!(slips.is_empty());
    }

    #[tokio::test]
    async fn test_receive_credits_and_relocates() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        let done = h
            .ledger
            .receive_transfer(slip.id, h.receiver, RECEIVER_PIN)
            .await
            .unwrap();

        assert_eq!(done.status, SlipStatus::Completed);
        assert_eq!(done.receiver_staff_id, Some(h.receiver));
        assert!(done.received_at.is_some());

        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 10);
        assert_eq!(product.current_branch, h.dest);
    }

    #[tokio::test]
    async fn test_receive_requires_destination_affinity() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        let err = h
            .ledger
            .receive_transfer(slip.id, h.clerk, CLERK_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[tokio::test]
    async fn test_receive_unknown_slip() {
        let h = harness().await;
        let err = h
            .ledger
            .receive_transfer(SlipId::new(), h.receiver, RECEIVER_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_receive_twice_does_not_double_credit() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        h.ledger
            .receive_transfer(slip.id, h.receiver, RECEIVER_PIN)
            .await
            .unwrap();
        let err = h
            .ledger
            .receive_transfer(slip.id, h.receiver, RECEIVER_PIN)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_STATE");
        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 10);
    }

    #[tokio::test]
    async fn test_cancel_by_initiator_restores_origin() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        let cancelled = h
            .ledger
            .cancel_transfer(slip.id, h.clerk, CLERK_PIN)
            .await
            .unwrap();

        assert_eq!(cancelled.status, SlipStatus::Cancelled);
        // Cancellation never fills the receiver fields
        assert!(cancelled.receiver_staff_id.is_none());
        assert!(cancelled.received_at.is_none());

        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 10);
        assert_eq!(product.current_branch, h.origin);
    }

    #[tokio::test]
    async fn test_cancel_by_manager_who_did_not_initiate() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        let cancelled = h
            .ledger
            .cancel_transfer(slip.id, h.dest_manager, MANAGER_PIN)
            .await
            .unwrap();
        assert_eq!(cancelled.status, SlipStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_authorization_checked_before_pin() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        // Plain staff, not the initiator, wrong PIN on purpose: the
        // authorization failure must win.
        let err = h
            .ledger
            .cancel_transfer(slip.id, h.receiver, "999999")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[tokio::test]
    async fn test_cancel_initiator_still_needs_pin() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        let err = h
            .ledger
            .cancel_transfer(slip.id, h.clerk, "999999")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PIN_MISMATCH");

        let slip = h.ledger.get_slip(slip.id).await.unwrap();
        assert_eq!(slip.status, SlipStatus::InTransit);
    }

    #[tokio::test]
    async fn test_cancel_completed_slip_rejected() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();
        h.ledger
            .receive_transfer(slip.id, h.receiver, RECEIVER_PIN)
            .await
            .unwrap();

        let err = h
            .ledger
            .cancel_transfer(slip.id, h.clerk, CLERK_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");
        assert_eq!(err.http_status(), 409);
    }

    #[tokio::test]
    async fn test_resolve_by_token_any_status() {
        let h = harness().await;
        let slip = h
            .ledger
            .initiate_transfer(h.initiate_req(4, CLERK_PIN))
            .await
            .unwrap();

        let resolved = h.ledger.resolve_slip_by_token(&slip.token).await.unwrap();
        assert_eq!(resolved.id, slip.id);

        h.ledger
            .receive_transfer(slip.id, h.receiver, RECEIVER_PIN)
            .await
            .unwrap();

        // Terminal slips still resolve; the status tells the scanner
        let resolved = h.ledger.resolve_slip_by_token(&slip.token).await.unwrap();
        assert_eq!(resolved.status, SlipStatus::Completed);

        let err = h.ledger.resolve_slip_by_token("ST1garbage").await.unwrap_err();
        assert_eq!(err.code(), "BAD_TOKEN");
    }

    #[tokio::test]
    async fn test_register_stock_requires_admin() {
        let h = harness().await;
        let err = h
            .ledger
            .register_stock("Kettle", "KT-1", 5, h.origin, h.clerk, CLERK_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");

        let err = h
            .ledger
            .register_stock("Kettle", "KT-1", 5, h.origin, h.dest_manager, MANAGER_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[tokio::test]
    async fn test_register_stock_allows_zero_opening_quantity() {
        let h = harness().await;
        let product = h
            .ledger
            .register_stock("Kettle", "KT-1", 0, h.origin, h.admin, ADMIN_PIN)
            .await
            .unwrap();
        assert_eq!(product.quantity, 0);
    }

    #[tokio::test]
    async fn test_adjust_stock_roles_and_floor() {
        let h = harness().await;

        let err = h
            .ledger
            .adjust_stock(h.product, 5, h.clerk, CLERK_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");

        let err = h
            .ledger
            .adjust_stock(h.product, 0, h.admin, ADMIN_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");

        let product = h
            .ledger
            .adjust_stock(h.product, 5, h.admin, ADMIN_PIN)
            .await
            .unwrap();
        assert_eq!(product.quantity, 15);

        // Corrections never drive the count below zero
        let err = h
            .ledger
            .adjust_stock(h.product, -999, h.admin, ADMIN_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
        let product = h.ledger.get_product(h.product).await.unwrap();
        assert_eq!(product.quantity, 15);
    }

    #[tokio::test]
    async fn test_adjust_stock_manager_confined_to_own_branch() {
        let h = harness().await;
        // Product sits at the origin; the manager works at the destination
        let err = h
            .ledger
            .adjust_stock(h.product, 1, h.dest_manager, MANAGER_PIN)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[tokio::test]
    async fn test_list_slips_filter_and_order() {
        let h = harness().await;
        let first = h
            .ledger
            .initiate_transfer(h.initiate_req(1, CLERK_PIN))
            .await
            .unwrap();
        let second = h
            .ledger
            .initiate_transfer(h.initiate_req(2, CLERK_PIN))
            .await
            .unwrap();
        h.ledger
            .receive_transfer(second.id, h.receiver, RECEIVER_PIN)
            .await
            .unwrap();

        // Most recent first
        let all = h.ledger.list_slips(&SlipFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let in_transit = h
            .ledger
            .list_slips(&SlipFilter {
                status: Some(SlipStatus::InTransit),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_transit.len(), 1);
        assert_eq!(in_transit[0].id, first.id);

        let touching_dest = h
            .ledger
            .list_slips(&SlipFilter {
                branch: Some(h.dest),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(touching_dest.len(), 2);
    }
}
