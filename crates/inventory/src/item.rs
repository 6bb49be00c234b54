use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, ItemCode, ValueObject};

/// One catalog item and its current stock.
///
/// `quantity` is never negative: [`Item::set_quantity`] is the only way to
/// change it and rejects negative or non-finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    code: ItemCode,
    name: String,
    description: String,
    unit_of_measure: String,
    quantity: f64,
}

impl Item {
    /// New item with zero stock. No validation of the code format happens here.
    pub fn new(
        code: impl Into<ItemCode>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            unit_of_measure: unit_of_measure.into(),
            quantity: 0.0,
        }
    }

    pub fn code(&self) -> &ItemCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Replace the stored quantity.
    pub fn set_quantity(&mut self, quantity: f64) -> DomainResult<()> {
        if !quantity.is_finite() {
            return Err(DomainError::invalid_quantity("quantity must be a finite number"));
        }
        if quantity < 0.0 {
            return Err(DomainError::invalid_quantity("quantity cannot be negative"));
        }
        self.quantity = quantity;
        Ok(())
    }

    pub fn describe(&self) -> ItemSnapshot {
        ItemSnapshot {
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            unit_of_measure: self.unit_of_measure.clone(),
            quantity: self.quantity,
        }
    }
}

impl Entity for Item {
    type Id = ItemCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ({}) - {} {}",
            self.name, self.code, self.quantity, self.unit_of_measure
        )
    }
}

/// Read-only view of an [`Item`] for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub code: ItemCode,
    pub name: String,
    pub description: String,
    pub unit_of_measure: String,
    pub quantity: f64,
}

impl ValueObject for ItemSnapshot {}
