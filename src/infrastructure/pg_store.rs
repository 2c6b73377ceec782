use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::{DomainError, Entity};
use crate::domain::order::{Line, NewLine, Order};
use crate::domain::ports::{LineStore, OrderStore, ProductStore, Transaction, UnitOfWork};
use crate::domain::product::Product;
use crate::schema::{order_lines, orders, products};

use super::models::{
    LineRow, NewLineRow, OrderChangeset, OrderRow, ProductRow, ProductStockChangeset,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Unit of work ──────────────────────────────────────────────────────────────

pub struct PgUnitOfWork {
    pool: DbPool,
}

impl PgUnitOfWork {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UnitOfWork for PgUnitOfWork {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, DomainError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;

        // Diesel rolls back when the closure returns `Err`; a panicking
        // closure leaves the connection broken and the server aborts the
        // transaction when r2d2 discards it.
        conn.transaction::<_, DomainError, _>(|conn| {
            let mut tx = PgTransaction { conn };
            f(&mut tx)
        })
    }
}

/// Store operations bound to one open Postgres transaction.
///
/// Orders and products are read with `SELECT ... FOR UPDATE`, so two
/// transactions touching the same rows queue up behind each other instead
/// of overwriting each other's stock counters.
struct PgTransaction<'c> {
    conn: &'c mut PgConnection,
}

impl OrderStore for PgTransaction<'_> {
    fn find_order(&mut self, id: i32) -> Result<Option<Order>, DomainError> {
        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .for_update()
            .first(self.conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = LineRow::belonging_to(&order)
            .select(LineRow::as_select())
            .order(order_lines::id.asc())
            .load(self.conn)?;

        log::debug!("Loaded order {} with {} line(s)", order.id, lines.len());
        Ok(Some(order.into_order(lines)))
    }

    fn save_order(&mut self, order: &Order) -> Result<(), DomainError> {
        let updated = diesel::update(orders::table.find(order.id))
            .set(OrderChangeset::from(order))
            .execute(self.conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(Entity::Order, order.id));
        }
        Ok(())
    }
}

impl ProductStore for PgTransaction<'_> {
    fn find_product(&mut self, id: i32) -> Result<Option<Product>, DomainError> {
        let product = products::table
            .find(id)
            .select(ProductRow::as_select())
            .for_update()
            .first(self.conn)
            .optional()?;
        Ok(product.map(Product::from))
    }

    fn save_product(&mut self, product: &Product) -> Result<(), DomainError> {
        let updated = diesel::update(products::table.find(product.id))
            .set(ProductStockChangeset::from(product))
            .execute(self.conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound(Entity::Product, product.id));
        }
        log::debug!(
            "Product {} now has {} in stock, {} on order",
            product.id,
            product.units_in_stock,
            product.units_on_order
        );
        Ok(())
    }
}

impl LineStore for PgTransaction<'_> {
    fn insert_line(&mut self, line: NewLine) -> Result<Line, DomainError> {
        let row = diesel::insert_into(order_lines::table)
            .values(&NewLineRow {
                order_id: line.order_id,
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .returning(LineRow::as_returning())
            .get_result(self.conn)?;
        Ok(row.into())
    }
}
