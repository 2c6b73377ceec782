use std::fmt;

use thiserror::Error;

/// Aggregate kinds a lookup can miss on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Order,
    Product,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Order => f.write_str("Order"),
            Entity::Product => f.write_str("Product"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} {1} not found")]
    NotFound(Entity, i32),
    #[error("Order {0} has already been shipped")]
    AlreadyShipped(i32),
    #[error("Invalid quantity {0}: must be strictly positive")]
    InvalidQuantity(i32),
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },
    #[error("Product {product_id} cannot take {requested} more units on order")]
    OnOrderOverflow { product_id: i32, requested: i32 },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Business-rule rejections, as opposed to store failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, DomainError::Internal(_))
    }
}
