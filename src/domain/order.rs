use chrono::NaiveDate;
use serde::Serialize;

use super::errors::DomainError;

/// A persisted order line. Never updated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// A line that has passed validation but has no key yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: i32,
    pub customer_id: String,
    pub ordered_on: NaiveDate,
    /// `None` until the order has been dispatched.
    pub shipped_on: Option<NaiveDate>,
    /// In the order the lines were added.
    pub lines: Vec<Line>,
}

impl Order {
    pub fn is_shipped(&self) -> bool {
        self.shipped_on.is_some()
    }

    /// Fails once the order has been dispatched; lines may only be added
    /// to open orders.
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_shipped() {
            return Err(DomainError::AlreadyShipped(self.id));
        }
        Ok(())
    }

    pub fn push_line(&mut self, line: Line) {
        debug_assert_eq!(line.order_id, self.id);
        self.lines.push(line);
    }
}

/// Zero is rejected along with negative quantities.
pub fn ensure_positive_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::InvalidQuantity(quantity));
    }
    Ok(())
}
