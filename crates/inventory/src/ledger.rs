use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, ItemCode, LedgerId, MovementId,
};
use stockledger_events::{Command, Event};

use crate::item::Item;
use crate::movement::{ensure_positive, exceeds_stock, MovementKind, MovementRecord};
use crate::report::InventoryReport;

/// Aggregate root: the inventory ledger.
///
/// Owns every registered [`Item`] (in registration order) and the
/// append-only, chronological list of [`MovementRecord`]s. It is the only
/// writer of item quantities, so the invariants hold together:
///
/// - stock is never negative;
/// - every quantity change has exactly one movement record;
/// - every movement references a registered item.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    id: LedgerId,
    items: Vec<Item>,
    index: HashMap<ItemCode, usize>,
    movements: Vec<MovementRecord>,
    version: u64,
}

/// Command: RegisterItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterItem {
    pub code: ItemCode,
    pub name: String,
    pub description: String,
    pub unit_of_measure: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordEntry (stock in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub code: ItemCode,
    pub movement_id: MovementId,
    pub quantity: f64,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordExit (stock out).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordExit {
    pub code: ItemCode,
    pub movement_id: MovementId,
    pub quantity: f64,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerCommand {
    RegisterItem(RegisterItem),
    RecordEntry(RecordEntry),
    RecordExit(RecordExit),
}

impl Command for LedgerCommand {
    fn target_item(&self) -> &ItemCode {
        match self {
            LedgerCommand::RegisterItem(c) => &c.code,
            LedgerCommand::RecordEntry(c) => &c.code,
            LedgerCommand::RecordExit(c) => &c.code,
        }
    }
}

/// Event: ItemRegistered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRegistered {
    pub code: ItemCode,
    pub name: String,
    pub description: String,
    pub unit_of_measure: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MovementRecorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementRecorded {
    pub record: MovementRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LedgerEvent {
    ItemRegistered(ItemRegistered),
    MovementRecorded(MovementRecorded),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ItemRegistered(_) => "inventory.item.registered",
            LedgerEvent::MovementRecorded(e) => match e.record.kind() {
                MovementKind::Entry => "inventory.stock.entry_recorded",
                MovementKind::Exit => "inventory.stock.exit_recorded",
            },
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ItemRegistered(e) => e.occurred_at,
            LedgerEvent::MovementRecorded(e) => e.record.timestamp(),
        }
    }
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::with_id(LedgerId::new())
    }

    pub fn with_id(id: LedgerId) -> Self {
        Self {
            id,
            items: Vec::new(),
            index: HashMap::new(),
            movements: Vec::new(),
            version: 0,
        }
    }

    /// Register a new item with zero stock.
    ///
    /// A code that is already taken is rejected with `DuplicateItem`; the
    /// existing item is left untouched.
    pub fn register_item(
        &mut self,
        code: impl Into<ItemCode>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_of_measure: impl Into<String>,
    ) -> DomainResult<()> {
        let cmd = LedgerCommand::RegisterItem(RegisterItem {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            unit_of_measure: unit_of_measure.into(),
            occurred_at: Utc::now(),
        });
        self.execute(&cmd)?;
        Ok(())
    }

    /// Add `quantity` to the item's stock and append an entry movement.
    pub fn record_entry(
        &mut self,
        code: impl Into<ItemCode>,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<MovementRecord> {
        let cmd = LedgerCommand::RecordEntry(RecordEntry {
            code: code.into(),
            movement_id: MovementId::new(),
            quantity,
            reason,
            actor,
            occurred_at: Utc::now(),
        });
        self.execute_movement(&cmd)
    }

    /// Take `quantity` out of the item's stock and append an exit movement.
    ///
    /// Drawing the stock down to exactly zero is allowed; anything above the
    /// current stock is rejected, never clamped.
    pub fn record_exit(
        &mut self,
        code: impl Into<ItemCode>,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<MovementRecord> {
        let cmd = LedgerCommand::RecordExit(RecordExit {
            code: code.into(),
            movement_id: MovementId::new(),
            quantity,
            reason,
            actor,
            occurred_at: Utc::now(),
        });
        self.execute_movement(&cmd)
    }

    fn execute_movement(&mut self, cmd: &LedgerCommand) -> DomainResult<MovementRecord> {
        let events = self.execute(cmd)?;
        events
            .into_iter()
            .find_map(|e| match e {
                LedgerEvent::MovementRecorded(m) => Some(m.record),
                LedgerEvent::ItemRegistered(_) => None,
            })
            .ok_or_else(|| DomainError::unknown_item(cmd.target_item()))
    }

    pub fn get_item(&self, code: &str) -> Option<&Item> {
        self.index.get(code).map(|&i| &self.items[i])
    }

    pub fn current_stock(&self, code: &str) -> Option<f64> {
        self.get_item(code).map(Item::quantity)
    }

    /// All items in registration order.
    pub fn list_items(&self) -> &[Item] {
        &self.items
    }

    /// Movements of one item, oldest first. Each call walks the ledger anew.
    pub fn movements_for<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a MovementRecord> + 'a {
        self.movements
            .iter()
            .filter(move |m| m.item_code().as_str() == code)
    }

    /// The full chronological history, borrowed.
    pub fn movements(&self) -> &[MovementRecord] {
        &self.movements
    }

    /// Copy of the full chronological history.
    pub fn all_movements(&self) -> Vec<MovementRecord> {
        self.movements.clone()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn movement_count(&self) -> usize {
        self.movements.len()
    }

    pub fn build_report(&self) -> InventoryReport {
        InventoryReport::build(self, Utc::now())
    }
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRoot for InventoryLedger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for InventoryLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::ItemRegistered(e) => {
                self.index.insert(e.code.clone(), self.items.len());
                self.items.push(Item::new(
                    e.code.clone(),
                    e.name.clone(),
                    e.description.clone(),
                    e.unit_of_measure.clone(),
                ));
            }
            LedgerEvent::MovementRecorded(e) => {
                let record = &e.record;
                let Some(&i) = self.index.get(record.item_code()) else {
                    panic!(
                        "movement {} references unregistered item {}",
                        record.id_typed(),
                        record.item_code()
                    );
                };
                let item = &mut self.items[i];
                let next = record.kind().apply_to(item.quantity(), record.quantity());
                if let Err(err) = item.set_quantity(next) {
                    panic!("movement {} breaks stock invariant: {err}", record.id_typed());
                }
                self.movements.push(record.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::RegisterItem(cmd) => self.handle_register(cmd),
            LedgerCommand::RecordEntry(cmd) => self.handle_entry(cmd),
            LedgerCommand::RecordExit(cmd) => self.handle_exit(cmd),
        }
    }
}

impl InventoryLedger {
    fn ensure_item(&self, code: &ItemCode) -> DomainResult<&Item> {
        self.get_item(code.as_str())
            .ok_or_else(|| DomainError::unknown_item(code))
    }

    fn handle_register(&self, cmd: &RegisterItem) -> DomainResult<Vec<LedgerEvent>> {
        if self.index.contains_key(&cmd.code) {
            return Err(DomainError::duplicate_item(&cmd.code));
        }
        Ok(vec![LedgerEvent::ItemRegistered(ItemRegistered {
            code: cmd.code.clone(),
            name: cmd.name.clone(),
            description: cmd.description.clone(),
            unit_of_measure: cmd.unit_of_measure.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_entry(&self, cmd: &RecordEntry) -> DomainResult<Vec<LedgerEvent>> {
        let item = self.ensure_item(&cmd.code)?;
        ensure_positive(cmd.quantity)?;

        if !(item.quantity() + cmd.quantity).is_finite() {
            return Err(DomainError::invalid_quantity("resulting stock is out of range"));
        }

        let record = MovementRecord::at(
            cmd.movement_id,
            cmd.occurred_at,
            cmd.code.clone(),
            MovementKind::Entry,
            cmd.quantity,
            cmd.reason.clone(),
            cmd.actor.clone(),
        )?;
        Ok(vec![LedgerEvent::MovementRecorded(MovementRecorded { record })])
    }

    fn handle_exit(&self, cmd: &RecordExit) -> DomainResult<Vec<LedgerEvent>> {
        let item = self.ensure_item(&cmd.code)?;
        ensure_positive(cmd.quantity)?;

        if exceeds_stock(cmd.quantity, item.quantity()) {
            return Err(DomainError::insufficient_stock(cmd.quantity, item.quantity()));
        }

        let record = MovementRecord::at(
            cmd.movement_id,
            cmd.occurred_at,
            cmd.code.clone(),
            MovementKind::Exit,
            cmd.quantity,
            cmd.reason.clone(),
            cmd.actor.clone(),
        )?;
        Ok(vec![LedgerEvent::MovementRecorded(MovementRecorded { record })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stockledger_core::ErrorKind;

    fn ledger_with(codes: &[&str]) -> InventoryLedger {
        let mut ledger = InventoryLedger::new();
        for code in codes {
            ledger
                .register_item(*code, format!("Item {code}"), "", "unit")
                .unwrap();
        }
        ledger
    }

    #[test]
    fn entry_exit_and_rejected_exit_scenario() {
        let mut ledger = ledger_with(&["A1"]);
        assert_eq!(ledger.current_stock("A1"), Some(0.0));

        ledger.record_entry("A1", 10.0, None, None).unwrap();
        ledger.record_exit("A1", 3.0, None, None).unwrap();
        let err = ledger.record_exit("A1", 100.0, None, None).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidQuantity);
        assert_eq!(ledger.current_stock("A1"), Some(7.0));
        assert_eq!(ledger.movements_for("A1").count(), 2);
        assert_eq!(ledger.movement_count(), 2);
    }

    #[test]
    fn duplicate_registration_keeps_original_item() {
        let mut ledger = InventoryLedger::new();
        ledger.register_item("A1", "Bolt", "steel", "unit").unwrap();
        ledger.record_entry("A1", 5.0, None, None).unwrap();

        let err = ledger.register_item("A1", "Other", "changed", "kg").unwrap_err();
        assert_eq!(err, DomainError::duplicate_item("A1"));

        let item = ledger.get_item("A1").unwrap();
        assert_eq!(item.name(), "Bolt");
        assert_eq!(item.description(), "steel");
        assert_eq!(item.unit_of_measure(), "unit");
        assert_eq!(item.quantity(), 5.0);
        assert_eq!(ledger.item_count(), 1);
    }

    #[test]
    fn non_positive_entries_are_rejected_for_any_item() {
        let mut ledger = ledger_with(&["A1"]);

        for code in ["A1", "NOPE"] {
            for q in [-5.0, 0.0] {
                assert!(ledger.record_entry(code, q, None, None).is_err());
                assert!(ledger.record_exit(code, q, None, None).is_err());
            }
        }
        assert_eq!(ledger.movement_count(), 0);
        assert_eq!(ledger.current_stock("A1"), Some(0.0));
    }

    #[test]
    fn unknown_item_is_reported() {
        let mut ledger = InventoryLedger::new();
        let err = ledger.record_entry("ZZ", 1.0, None, None).unwrap_err();
        assert_eq!(err, DomainError::unknown_item("ZZ"));
        assert!(ledger.get_item("ZZ").is_none());
        assert_eq!(ledger.current_stock("ZZ"), None);
    }

    #[test]
    fn exit_of_full_stock_drains_to_zero() {
        let mut ledger = ledger_with(&["A1"]);
        ledger.record_entry("A1", 4.25, None, None).unwrap();

        let rec = ledger.record_exit("A1", 4.25, None, None).unwrap();
        assert!(rec.is_exit());
        assert_eq!(ledger.current_stock("A1"), Some(0.0));
    }

    #[test]
    fn record_carries_requested_amount_not_balance() {
        let mut ledger = ledger_with(&["A1"]);
        ledger.record_entry("A1", 10.0, None, None).unwrap();
        let rec = ledger
            .record_exit("A1", 3.0, Some("sold".into()), Some("ana".into()))
            .unwrap();

        assert_eq!(rec.quantity(), 3.0);
        assert_eq!(rec.kind(), MovementKind::Exit);
        assert_eq!(rec.reason(), "sold");
        assert_eq!(rec.actor(), "ana");
        assert_eq!(ledger.all_movements().last(), Some(&rec));
    }

    #[test]
    fn non_finite_quantities_are_rejected() {
        let mut ledger = ledger_with(&["A1"]);
        assert!(ledger.record_entry("A1", f64::NAN, None, None).is_err());
        assert!(ledger.record_entry("A1", f64::INFINITY, None, None).is_err());
        ledger.record_entry("A1", f64::MAX, None, None).unwrap();
        assert!(ledger.record_entry("A1", f64::MAX, None, None).is_err());
        assert_eq!(ledger.movement_count(), 1);
    }

    #[test]
    fn decimal_entries_can_be_drawn_back_to_zero() {
        let mut ledger = ledger_with(&["A1"]);
        ledger.record_entry("A1", 0.3, None, None).unwrap();
        ledger.record_exit("A1", 0.1, None, None).unwrap();
        ledger.record_exit("A1", 0.2, None, None).unwrap();
        assert_eq!(ledger.current_stock("A1"), Some(0.0));

        ledger.record_entry("A1", 0.1, None, None).unwrap();
        ledger.record_entry("A1", 0.2, None, None).unwrap();
        ledger.record_exit("A1", 0.3, None, None).unwrap();
        assert_eq!(ledger.current_stock("A1"), Some(0.0));

        let err = ledger.record_exit("A1", 0.1, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuantity);
        assert_eq!(ledger.movement_count(), 6);
    }

    #[test]
    fn with_id_keeps_the_given_ledger_id() {
        let id = LedgerId::new();
        let ledger = InventoryLedger::with_id(id);
        assert_eq!(ledger.id(), &id);
        assert_eq!(ledger.version(), 0);
        assert_ne!(InventoryLedger::new().id(), &id);
    }

    #[test]
    fn list_items_keeps_registration_order() {
        let ledger = ledger_with(&["C3", "A1", "B2"]);
        let codes: Vec<&str> = ledger.list_items().iter().map(|i| i.code().as_str()).collect();
        assert_eq!(codes, vec!["C3", "A1", "B2"]);
    }

    #[test]
    fn all_movements_is_a_detached_copy() {
        let mut ledger = ledger_with(&["A1"]);
        ledger.record_entry("A1", 1.0, None, None).unwrap();

        let mut copy = ledger.all_movements();
        copy.clear();
        assert_eq!(ledger.all_movements().len(), 1);
        assert_eq!(ledger.movements(), ledger.all_movements().as_slice());
    }

    #[test]
    fn movements_for_is_restartable() {
        let mut ledger = ledger_with(&["A1", "B2"]);
        ledger.record_entry("A1", 1.0, None, None).unwrap();
        ledger.record_entry("B2", 2.0, None, None).unwrap();
        ledger.record_entry("A1", 3.0, None, None).unwrap();

        let first: Vec<f64> = ledger.movements_for("A1").map(|m| m.quantity()).collect();
        let second: Vec<f64> = ledger.movements_for("A1").map(|m| m.quantity()).collect();
        assert_eq!(first, vec![1.0, 3.0]);
        assert_eq!(first, second);
        assert_eq!(ledger.movements_for("missing").count(), 0);
    }

    #[test]
    fn handle_does_not_mutate_and_version_counts_events() {
        let mut ledger = ledger_with(&["A1"]);
        assert_eq!(ledger.version(), 1);

        let cmd = LedgerCommand::RecordEntry(RecordEntry {
            code: ItemCode::new("A1"),
            movement_id: MovementId::new(),
            quantity: 2.0,
            reason: None,
            actor: None,
            occurred_at: Utc::now(),
        });
        let events = ledger.handle(&cmd).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "inventory.stock.entry_recorded");
        assert_eq!(ledger.movement_count(), 0);

        ledger.apply(&events[0]);
        assert_eq!(ledger.version(), 2);
        assert_eq!(ledger.current_stock("A1"), Some(2.0));
    }

    #[test]
    fn rejected_commands_leave_version_unchanged() {
        let mut ledger = ledger_with(&["A1"]);
        let _ = ledger.record_exit("A1", 1.0, None, None);
        let _ = ledger.register_item("A1", "x", "", "unit");
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    #[should_panic(expected = "breaks stock invariant")]
    fn applying_an_overdrawing_event_panics() {
        let mut ledger = ledger_with(&["A1"]);
        let record = MovementRecord::new("A1", MovementKind::Exit, 1.0, None, None).unwrap();
        ledger.apply(&LedgerEvent::MovementRecorded(MovementRecorded { record }));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Entry(f64),
        Exit(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..1_000u32).prop_map(|q| Op::Entry(q as f64)),
            (1u32..1_000u32).prop_map(|q| Op::Exit(q as f64)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: stock equals accepted entries minus accepted exits and is
        /// never negative; rejected exits change nothing.
        #[test]
        fn stock_is_sum_of_accepted_movements(ops in prop::collection::vec(op(), 1..60)) {
            let mut ledger = ledger_with(&["A1"]);
            let mut expected = 0.0f64;

            for op in ops {
                let before = ledger.movement_count();
                match op {
                    Op::Entry(q) => {
                        ledger.record_entry("A1", q, None, None).unwrap();
                        expected += q;
                    }
                    Op::Exit(q) => {
                        match ledger.record_exit("A1", q, None, None) {
                            Ok(rec) => {
                                prop_assert!(q <= expected);
                                prop_assert_eq!(rec.quantity(), q);
                                expected -= q;
                            }
                            Err(_) => {
                                prop_assert!(q > expected);
                                prop_assert_eq!(ledger.movement_count(), before);
                            }
                        }
                    }
                }
                let stock = ledger.current_stock("A1").unwrap();
                prop_assert!(stock >= 0.0);
                prop_assert_eq!(stock, expected);
            }

            let mut replayed = 0.0f64;
            for m in ledger.movements_for("A1") {
                replayed = m.kind().apply_to(replayed, m.quantity());
            }
            prop_assert_eq!(replayed, expected);
        }

        /// Property: per-item movement views partition the full history and
        /// report totals match the list views.
        #[test]
        fn movements_partition_by_item(picks in prop::collection::vec((0usize..3, 1u32..50), 0..40)) {
            let codes = ["A1", "B2", "C3"];
            let mut ledger = ledger_with(&codes);

            for (i, q) in picks {
                ledger.record_entry(codes[i], q as f64, None, None).unwrap();
            }

            let all = ledger.all_movements();
            let mut total = 0;
            for code in codes {
                let ids: Vec<MovementId> = ledger.movements_for(code).map(|m| m.id_typed()).collect();
                let expected: Vec<MovementId> = all
                    .iter()
                    .filter(|m| m.item_code().as_str() == code)
                    .map(|m| m.id_typed())
                    .collect();
                prop_assert_eq!(&ids, &expected);
                total += ids.len();
            }
            prop_assert_eq!(total, all.len());

            let report = ledger.build_report();
            prop_assert_eq!(report.total_items, ledger.list_items().len());
            prop_assert_eq!(report.total_movements, ledger.all_movements().len());
        }
    }
}
