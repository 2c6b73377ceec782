use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::order::{Line, Order};
use crate::domain::product::Product;
use crate::schema::{order_lines, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub customer_id: String,
    pub ordered_on: NaiveDate,
    pub shipped_on: Option<NaiveDate>,
}

impl OrderRow {
    pub fn into_order(self, lines: Vec<LineRow>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            ordered_on: self.ordered_on,
            shipped_on: self.shipped_on,
            lines: lines.into_iter().map(Line::from).collect(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: i32,
    pub customer_id: String,
    pub ordered_on: NaiveDate,
    pub shipped_on: Option<NaiveDate>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderChangeset<'a> {
    pub customer_id: &'a str,
    pub ordered_on: NaiveDate,
    pub shipped_on: Option<NaiveDate>,
}

impl<'a> From<&'a Order> for OrderChangeset<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            customer_id: &order.customer_id,
            ordered_on: order.ordered_on,
            shipped_on: order.shipped_on,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub unit_price: BigDecimal,
    pub units_in_stock: i32,
    pub units_on_order: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            unit_price: row.unit_price,
            units_in_stock: row.units_in_stock,
            units_on_order: row.units_on_order,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: i32,
    pub name: String,
    pub unit_price: BigDecimal,
    pub units_in_stock: i32,
    pub units_on_order: i32,
}

/// Stock counters only; name and price are not touched by order lines.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductStockChangeset {
    pub units_in_stock: i32,
    pub units_on_order: i32,
}

impl From<&Product> for ProductStockChangeset {
    fn from(product: &Product) -> Self {
        Self {
            units_in_stock: product.units_in_stock,
            units_on_order: product.units_on_order,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LineRow {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl From<LineRow> for Line {
    fn from(row: LineRow) -> Self {
        Line {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewLineRow {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}
