use bigdecimal::BigDecimal;
use serde::Serialize;

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub unit_price: BigDecimal,
    pub units_in_stock: i32,
    pub units_on_order: i32,
}

impl Product {
    /// Moves `quantity` units from stock to on-order. Leaves the product
    /// untouched on any failure.
    pub fn reserve(&mut self, quantity: i32) -> Result<(), DomainError> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        if quantity > self.units_in_stock {
            return Err(DomainError::InsufficientStock {
                product_id: self.id,
                requested: quantity,
                available: self.units_in_stock,
            });
        }
        let on_order = self
            .units_on_order
            .checked_add(quantity)
            .ok_or(DomainError::OnOrderOverflow {
                product_id: self.id,
                requested: quantity,
            })?;
        self.units_in_stock -= quantity;
        self.units_on_order = on_order;
        Ok(())
    }
}
