//! Thread-safe handle to a single ledger.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use stockledger_core::{DomainError, DomainResult, ItemCode};

use crate::item::ItemSnapshot;
use crate::ledger::InventoryLedger;
use crate::movement::{MovementKind, MovementRecord, MovementSnapshot};
use crate::report::InventoryReport;

/// Result of an accepted entry or exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedMovement {
    pub movement: MovementSnapshot,
    /// Stock of the item right before the movement, read under the same lock.
    pub previous_stock: f64,
    /// Stock of the item right after the movement.
    pub stock: f64,
}

/// Ledger shared between concurrent callers.
///
/// A single `RwLock` guards items and movements together. Writers hold it for
/// the whole check-mutate-append sequence, so two exits racing on the same
/// item can never both pass the stock check. Readers get owned snapshots.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<InventoryLedger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::from_ledger(InventoryLedger::new())
    }

    pub fn from_ledger(ledger: InventoryLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // A panic while holding the lock cannot leave half-applied state (handle
    // validates before apply touches anything), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, InventoryLedger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InventoryLedger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_item(
        &self,
        code: impl Into<ItemCode>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_of_measure: impl Into<String>,
    ) -> DomainResult<ItemSnapshot> {
        let code = code.into();
        let mut ledger = self.write();

        match ledger.register_item(code.clone(), name, description, unit_of_measure) {
            Ok(()) => {
                tracing::info!(item = %code, "item registered");
                ledger
                    .get_item(code.as_str())
                    .map(|i| i.describe())
                    .ok_or_else(|| DomainError::unknown_item(&code))
            }
            Err(err) => {
                tracing::warn!(item = %code, error = %err, "item registration rejected");
                Err(err)
            }
        }
    }

    pub fn record_entry(
        &self,
        code: impl Into<ItemCode>,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<RecordedMovement> {
        self.record(MovementKind::Entry, code.into(), quantity, reason, actor)
    }

    pub fn record_exit(
        &self,
        code: impl Into<ItemCode>,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<RecordedMovement> {
        self.record(MovementKind::Exit, code.into(), quantity, reason, actor)
    }

    fn record(
        &self,
        kind: MovementKind,
        code: ItemCode,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<RecordedMovement> {
        let mut ledger = self.write();
        let previous_stock = ledger.current_stock(code.as_str()).unwrap_or_default();

        let result = match kind {
            MovementKind::Entry => ledger.record_entry(code.clone(), quantity, reason, actor),
            MovementKind::Exit => ledger.record_exit(code.clone(), quantity, reason, actor),
        };

        match result {
            Ok(record) => {
                let stock = ledger.current_stock(code.as_str()).unwrap_or_default();
                tracing::info!(
                    item = %code,
                    kind = %kind,
                    quantity,
                    stock,
                    movement_id = %record.id_typed(),
                    actor = record.actor(),
                    "movement recorded"
                );
                Ok(RecordedMovement {
                    movement: record.describe(),
                    previous_stock,
                    stock,
                })
            }
            Err(err) => {
                tracing::warn!(item = %code, kind = %kind, quantity, error = %err, "movement rejected");
                Err(err)
            }
        }
    }

    pub fn get_item(&self, code: &str) -> Option<ItemSnapshot> {
        self.read().get_item(code).map(|i| i.describe())
    }

    pub fn current_stock(&self, code: &str) -> Option<f64> {
        self.read().current_stock(code)
    }

    pub fn list_items(&self) -> Vec<ItemSnapshot> {
        self.read().list_items().iter().map(|i| i.describe()).collect()
    }

    pub fn movements_for(&self, code: &str) -> Vec<MovementSnapshot> {
        self.read().movements_for(code).map(|m| m.describe()).collect()
    }

    pub fn all_movements(&self) -> Vec<MovementSnapshot> {
        self.read().movements().iter().map(MovementRecord::describe).collect()
    }

    pub fn build_report(&self) -> InventoryReport {
        self.read().build_report()
    }

    /// Run `f` against the ledger under the read lock.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&InventoryLedger) -> R) -> R {
        f(&self.read())
    }
}
