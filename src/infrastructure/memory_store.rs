use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::errors::{DomainError, Entity};
use crate::domain::order::{Line, NewLine, Order};
use crate::domain::ports::{LineStore, OrderStore, ProductStore, Transaction, UnitOfWork};
use crate::domain::product::Product;

/// Committed contents of the store. Transactions work on a clone and
/// replace the committed copy only when they succeed.
#[derive(Debug, Clone, Default)]
struct MemoryState {
    /// Order rows, stored without their lines.
    orders: BTreeMap<i32, Order>,
    products: BTreeMap<i32, Product>,
    /// Keyed by line id, which grows with each insert.
    lines: BTreeMap<i32, Line>,
    last_line_id: i32,
}

/// A unit of work over process memory.
///
/// One mutex guards the whole store, so transactions run one at a time.
#[derive(Debug, Default)]
pub struct InMemoryUnitOfWork {
    state: Mutex<MemoryState>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, mut order: Order) -> Self {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for line in order.lines.drain(..) {
            state.last_line_id = state.last_line_id.max(line.id);
            state.lines.insert(line.id, line);
        }
        state.orders.insert(order.id, order);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.products.insert(product.id, product);
        self
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>,
    {
        // A panicking transaction never reaches the swap below, so the
        // committed state behind a poisoned lock is still consistent.
        let mut committed = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut working = committed.clone();
        let out = f(&mut working)?;
        *committed = working;
        Ok(out)
    }
}

impl OrderStore for MemoryState {
    fn find_order(&mut self, id: i32) -> Result<Option<Order>, DomainError> {
        let Some(order) = self.orders.get(&id) else {
            return Ok(None);
        };
        let mut order = order.clone();
        order.lines = self
            .lines
            .values()
            .filter(|l| l.order_id == id)
            .cloned()
            .collect();
        Ok(Some(order))
    }

    fn save_order(&mut self, order: &Order) -> Result<(), DomainError> {
        let row = self
            .orders
            .get_mut(&order.id)
            .ok_or(DomainError::NotFound(Entity::Order, order.id))?;
        row.customer_id = order.customer_id.clone();
        row.ordered_on = order.ordered_on;
        row.shipped_on = order.shipped_on;
        Ok(())
    }
}

impl ProductStore for MemoryState {
    fn find_product(&mut self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.products.get(&id).cloned())
    }

    fn save_product(&mut self, product: &Product) -> Result<(), DomainError> {
        if product.units_in_stock < 0 || product.units_on_order < 0 {
            return Err(DomainError::Internal(format!(
                "product {} would hold a negative unit count",
                product.id
            )));
        }
        let row = self
            .products
            .get_mut(&product.id)
            .ok_or(DomainError::NotFound(Entity::Product, product.id))?;
        *row = product.clone();
        Ok(())
    }
}

impl LineStore for MemoryState {
    fn insert_line(&mut self, line: NewLine) -> Result<Line, DomainError> {
        if line.quantity <= 0 {
            return Err(DomainError::Internal(format!(
                "line quantity {} violates the positive quantity constraint",
                line.quantity
            )));
        }
        if !self.orders.contains_key(&line.order_id) {
            return Err(DomainError::NotFound(Entity::Order, line.order_id));
        }
        if !self.products.contains_key(&line.product_id) {
            return Err(DomainError::NotFound(Entity::Product, line.product_id));
        }
        self.last_line_id += 1;
        let line = Line {
            id: self.last_line_id,
            order_id: line.order_id,
            product_id: line.product_id,
            quantity: line.quantity,
        };
        self.lines.insert(line.id, line.clone());
        Ok(line)
    }
}
