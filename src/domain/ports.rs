use super::errors::DomainError;
use super::order::{Line, NewLine, Order};
use super::product::Product;

pub trait OrderStore {
    /// Loads the order together with its lines.
    fn find_order(&mut self, id: i32) -> Result<Option<Order>, DomainError>;
    /// Persists the order row. Lines are written through [`LineStore`].
    fn save_order(&mut self, order: &Order) -> Result<(), DomainError>;
}

pub trait ProductStore {
    fn find_product(&mut self, id: i32) -> Result<Option<Product>, DomainError>;
    fn save_product(&mut self, product: &Product) -> Result<(), DomainError>;
}

pub trait LineStore {
    /// Inserts the line and returns it with its generated key.
    fn insert_line(&mut self, line: NewLine) -> Result<Line, DomainError>;
}

/// The stores as seen from inside one open transaction.
pub trait Transaction: OrderStore + ProductStore + LineStore {}

impl<T: OrderStore + ProductStore + LineStore> Transaction for T {}

pub trait UnitOfWork: Send + Sync + 'static {
    /// Runs `f` in a single transaction: commits when it returns `Ok`,
    /// rolls back on `Err` or unwind.
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>;
}
