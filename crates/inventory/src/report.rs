use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::ValueObject;

use crate::item::ItemSnapshot;
use crate::ledger::InventoryLedger;

/// Point-in-time summary of a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub generated_at: DateTime<Utc>,
    pub total_items: usize,
    pub total_movements: usize,
    /// Registration order.
    pub items: Vec<ItemSnapshot>,
}

impl ValueObject for InventoryReport {}

impl InventoryReport {
    pub fn build(ledger: &InventoryLedger, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            total_items: ledger.item_count(),
            total_movements: ledger.movement_count(),
            items: ledger.list_items().iter().map(|i| i.describe()).collect(),
        }
    }
}
