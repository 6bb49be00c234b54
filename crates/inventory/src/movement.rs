use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, ItemCode, MovementId, ValueObject};

/// Actor recorded when the caller does not name one.
pub const DEFAULT_ACTOR: &str = "system";

/// Timestamp layout used in snapshots and display output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Direction of a stock change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Entry,
    Exit,
}

impl MovementKind {
    /// Reason recorded when the caller gives none.
    pub fn default_reason(self) -> &'static str {
        match self {
            MovementKind::Entry => "Stock entry",
            MovementKind::Exit => "Stock exit",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Entry => "ENTRY",
            MovementKind::Exit => "EXIT",
        }
    }

    /// Stock after applying a movement of `quantity` in this direction.
    ///
    /// An exit that lands within rounding noise of zero yields exactly zero.
    pub fn apply_to(self, stock: f64, quantity: f64) -> f64 {
        match self {
            MovementKind::Entry => stock + quantity,
            MovementKind::Exit => {
                let next = stock - quantity;
                if next.abs() <= stock_tolerance(stock, quantity) {
                    0.0
                } else {
                    next
                }
            }
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one accepted stock change.
///
/// `quantity` is always strictly positive; the direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementRecord {
    id: MovementId,
    item_code: ItemCode,
    kind: MovementKind,
    quantity: f64,
    reason: String,
    actor: String,
    timestamp: DateTime<Utc>,
}

impl MovementRecord {
    /// Build a record with a fresh id, stamped now.
    pub fn new(
        item_code: impl Into<ItemCode>,
        kind: MovementKind,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<Self> {
        Self::at(
            MovementId::new(),
            Utc::now(),
            item_code,
            kind,
            quantity,
            reason,
            actor,
        )
    }

    /// Build a record with an explicit id and timestamp.
    ///
    /// Blank `reason`/`actor` fall back to the kind's default reason and
    /// [`DEFAULT_ACTOR`].
    pub fn at(
        id: MovementId,
        timestamp: DateTime<Utc>,
        item_code: impl Into<ItemCode>,
        kind: MovementKind,
        quantity: f64,
        reason: Option<String>,
        actor: Option<String>,
    ) -> DomainResult<Self> {
        ensure_positive(quantity)?;

        Ok(Self {
            id,
            item_code: item_code.into(),
            kind,
            quantity,
            reason: non_blank(reason).unwrap_or_else(|| kind.default_reason().to_string()),
            actor: non_blank(actor).unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
            timestamp,
        })
    }

    pub fn id_typed(&self) -> MovementId {
        self.id
    }

    pub fn item_code(&self) -> &ItemCode {
        &self.item_code
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_entry(&self) -> bool {
        self.kind == MovementKind::Entry
    }

    pub fn is_exit(&self) -> bool {
        self.kind == MovementKind::Exit
    }

    pub fn describe(&self) -> MovementSnapshot {
        MovementSnapshot {
            id: self.id,
            item_code: self.item_code.clone(),
            kind: self.kind,
            quantity: self.quantity,
            reason: self.reason.clone(),
            actor: self.actor.clone(),
            timestamp: self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl Entity for MovementRecord {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for MovementRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: {} - {} ({})",
            self.kind,
            self.quantity,
            self.item_code,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Read-only view of a [`MovementRecord`] for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementSnapshot {
    pub id: MovementId,
    pub item_code: ItemCode,
    pub kind: MovementKind,
    pub quantity: f64,
    pub reason: String,
    pub actor: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub timestamp: String,
}

impl ValueObject for MovementSnapshot {}

pub(crate) fn ensure_positive(quantity: f64) -> DomainResult<()> {
    if !quantity.is_finite() {
        return Err(DomainError::invalid_quantity("quantity must be a finite number"));
    }
    if quantity <= 0.0 {
        return Err(DomainError::invalid_quantity("quantity must be greater than zero"));
    }
    Ok(())
}

/// Whether an exit of `quantity` would overdraw `stock`.
///
/// Differences below the accumulated rounding error of binary floats do not
/// count, so `0.1 + 0.2` units can be drawn out as `0.3`.
pub fn exceeds_stock(quantity: f64, stock: f64) -> bool {
    quantity - stock > stock_tolerance(stock, quantity)
}

fn stock_tolerance(stock: f64, quantity: f64) -> f64 {
    f64::EPSILON * 16.0 * stock.abs().max(quantity.abs()).max(1.0)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
