//! Inventory domain module.
//!
//! Item registry, append-only movement ledger, and the read views built on
//! top of them. Pure domain logic: no IO, no HTTP, no storage.

pub mod item;
pub mod ledger;
pub mod movement;
pub mod report;
pub mod shared;

pub use item::{Item, ItemSnapshot};
pub use ledger::{
    InventoryLedger, ItemRegistered, LedgerCommand, LedgerEvent, MovementRecorded, RecordEntry,
    RecordExit, RegisterItem,
};
pub use movement::{
    exceeds_stock, DEFAULT_ACTOR, MovementKind, MovementRecord, MovementSnapshot,
    TIMESTAMP_FORMAT,
};
pub use report::InventoryReport;
pub use shared::{RecordedMovement, SharedLedger};
