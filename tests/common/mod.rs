#![allow(dead_code)]

//! Shared fixture for the integration tests: an in-memory deployment with
//! two branches, four staff profiles and one stocked product.

use std::sync::Arc;

use stocktransit::audit::LocationAuditTrail;
use stocktransit::branch::{Branch, BranchRegistry};
use stocktransit::ledger::{InitiateRequest, Product, TransferLedger};
use stocktransit::staff::{StaffDirectory, StaffProfile};
use stocktransit::store::MemoryStore;
use stocktransit::StaffRole;

pub const CLERK_PIN: &str = "111111";
pub const RECEIVER_PIN: &str = "222222";
pub const MANAGER_PIN: &str = "333333";
pub const ADMIN_PIN: &str = "999999";

pub const OPENING_STOCK: u32 = 10;

pub struct World {
    pub ledger: Arc<TransferLedger>,
    pub registry: Arc<BranchRegistry>,
    pub directory: Arc<StaffDirectory>,
    pub audit: Arc<LocationAuditTrail>,

    /// Branch holding the opening stock
    pub origin: Branch,
    pub dest: Branch,

    /// Staff role at `origin`
    pub clerk: StaffProfile,
    /// Staff role at `dest`
    pub receiver: StaffProfile,
    /// Manager role at `dest`
    pub manager: StaffProfile,
    /// Admin role at `origin`
    pub admin: StaffProfile,

    /// "Espresso Grinder MK4", quantity [`OPENING_STOCK`] at `origin`
    pub product: Product,
}

impl World {
    /// An initiate request from the clerk moving `quantity` origin -> dest.
    pub fn initiate_req(&self, quantity: u32) -> InitiateRequest {
        InitiateRequest {
            product_id: self.product.id,
            quantity,
            from_branch: self.origin.id,
            to_branch: self.dest.id,
            initiator_staff_id: self.clerk.id,
            pin: CLERK_PIN.to_string(),
            notes: None,
        }
    }
}

pub async fn world() -> World {
    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(BranchRegistry::new(store.clone()));
    let directory = Arc::new(StaffDirectory::new(store.clone(), store.clone()));
    let ledger = Arc::new(TransferLedger::new(
        store.clone(),
        directory.clone(),
        registry.clone(),
    ));
    let audit = Arc::new(LocationAuditTrail::new(store));

    let origin = registry
        .create_branch("Dockside", "1 Pier Road")
        .await
        .unwrap();
    let dest = registry
        .create_branch("Uptown", "88 High Street")
        .await
        .unwrap();

    let admin = directory
        .create_profile("idp|admin", "Ada Root", StaffRole::Admin, origin.id, ADMIN_PIN)
        .await
        .unwrap();
    let clerk = directory
        .create_profile("idp|clerk", "Casey Shelf", StaffRole::Staff, origin.id, CLERK_PIN)
        .await
        .unwrap();
    let receiver = directory
        .create_profile("idp|recv", "Riley Dock", StaffRole::Staff, dest.id, RECEIVER_PIN)
        .await
        .unwrap();
    let manager = directory
        .create_profile("idp|mgr", "Morgan Lane", StaffRole::Manager, dest.id, MANAGER_PIN)
        .await
        .unwrap();

    let product = ledger
        .register_stock(
            "Espresso Grinder MK4",
            "EG-MK4-0017",
            OPENING_STOCK,
            origin.id,
            admin.id,
            ADMIN_PIN,
        )
        .await
        .unwrap();

    World {
        ledger,
        registry,
        directory,
        audit,
        origin,
        dest,
        clerk,
        receiver,
        manager,
        admin,
        product,
    }
}
