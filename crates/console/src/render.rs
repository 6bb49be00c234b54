//! Plain-text rendering of ledger views.
//!
//! Everything here is a pure function of snapshots; nothing touches the ledger.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use stockledger_inventory::{InventoryReport, ItemSnapshot, MovementSnapshot, TIMESTAMP_FORMAT};

const DESCRIPTION_WIDTH: usize = 30;
const REASON_WIDTH: usize = 25;

/// Cut `text` to `max` characters, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

fn rule(out: &mut String, width: usize) {
    let _ = writeln!(out, "{}", "-".repeat(width));
}

pub fn item_table(items: &[ItemSnapshot]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<20} {:<15} {:<10}", "Code", "Name", "Stock", "Unit");
    rule(&mut out, 60);
    for item in items {
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<15} {:<10}",
            item.code.as_str(),
            item.name,
            item.quantity,
            item.unit_of_measure
        );
    }
    out
}

/// History of one item (no item column).
pub fn item_movements_table(movements: &[MovementSnapshot]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:<10} {:<12} {:<28} {:<15}",
        "Timestamp", "Kind", "Quantity", "Reason", "Actor"
    );
    rule(&mut out, 88);
    for m in movements {
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:<12} {:<28} {:<15}",
            m.timestamp,
            m.kind.as_str(),
            m.quantity,
            truncate(&m.reason, REASON_WIDTH),
            m.actor
        );
    }
    out
}

/// Movements across items.
pub fn movements_table(movements: &[MovementSnapshot]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:<12} {:<10} {:<12} {:<28} {:<15}",
        "Timestamp", "Item", "Kind", "Quantity", "Reason", "Actor"
    );
    rule(&mut out, 100);
    for m in movements {
        let _ = writeln!(
            out,
            "{:<20} {:<12} {:<10} {:<12} {:<28} {:<15}",
            m.timestamp,
            m.item_code.as_str(),
            m.kind.as_str(),
            m.quantity,
            truncate(&m.reason, REASON_WIDTH),
            m.actor
        );
    }
    out
}

/// Full inventory report: summary, item details, and the `recent` newest
/// movements (newest first).
pub fn inventory_report(
    report: &InventoryReport,
    movements: &[MovementSnapshot],
    recent: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "INVENTORY REPORT");
    let _ = writeln!(out, "Generated at:    {}", report.generated_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "Total items:     {}", report.total_items);
    let _ = writeln!(out, "Total movements: {}", report.total_movements);
    let _ = writeln!(out);

    let _ = writeln!(out, "ITEM DETAILS");
    if report.items.is_empty() {
        let _ = writeln!(out, "No items registered.");
    } else {
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<34} {:<12} {:<10}",
            "Code", "Name", "Description", "Stock", "Unit"
        );
        rule(&mut out, 90);
        for item in &report.items {
            let _ = writeln!(
                out,
                "{:<10} {:<20} {:<34} {:<12} {:<10}",
                item.code.as_str(),
                item.name,
                truncate(&item.description, DESCRIPTION_WIDTH),
                item.quantity,
                item.unit_of_measure
            );
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "RECENT MOVEMENTS");
    if movements.is_empty() {
        let _ = writeln!(out, "No movements recorded.");
        return out;
    }

    let newest: Vec<MovementSnapshot> = movements.iter().rev().take(recent).cloned().collect();
    out.push_str(&movements_table(&newest));
    if movements.len() > recent {
        let _ = writeln!(
            out,
            "Showing the {} most recent of {} movements.",
            newest.len(),
            movements.len()
        );
    }
    out
}

/// Report for a single item with its full history, newest first.
pub fn item_report(
    item: &ItemSnapshot,
    movements: &[MovementSnapshot],
    queried_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ITEM REPORT: {}", item.name);
    let _ = writeln!(out, "Code:            {}", item.code);
    let _ = writeln!(out, "Name:            {}", item.name);
    let _ = writeln!(out, "Description:     {}", item.description);
    let _ = writeln!(out, "Unit of measure: {}", item.unit_of_measure);
    let _ = writeln!(out, "Current stock:   {} {}", item.quantity, item.unit_of_measure);
    let _ = writeln!(out, "Queried at:      {}", queried_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out);

    let _ = writeln!(out, "MOVEMENT HISTORY");
    if movements.is_empty() {
        let _ = writeln!(out, "No movements recorded for this item.");
        return out;
    }
    let newest_first: Vec<MovementSnapshot> = movements.iter().rev().cloned().collect();
    out.push_str(&item_movements_table(&newest_first));
    out
}
