use crate::domain::errors::{DomainError, Entity};
use crate::domain::order::{ensure_positive_quantity, Line, NewLine, Order};
use crate::domain::ports::{LineStore, OrderStore, ProductStore, UnitOfWork};
use crate::domain::product::Product;

pub struct OrderLineService<U> {
    uow: U,
}

impl<U: UnitOfWork> OrderLineService<U> {
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    /// Adds `quantity` units of a product to an open order.
    ///
    /// Checks run in this order, before anything is written: the product
    /// exists, the order exists, the order is not shipped, the quantity is
    /// strictly positive, the product has enough stock. On success the
    /// product's stock moves to on-order and the new line is appended to the
    /// order, all in one transaction. The order's shipped date is left as is.
    pub fn add_order_line(
        &self,
        order_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<Line, DomainError> {
        let result = self.uow.transaction(|tx| {
            let mut product = tx
                .find_product(product_id)?
                .ok_or(DomainError::NotFound(Entity::Product, product_id))?;
            let mut order = tx
                .find_order(order_id)?
                .ok_or(DomainError::NotFound(Entity::Order, order_id))?;

            order.ensure_open()?;
            ensure_positive_quantity(quantity)?;
            product.reserve(quantity)?;

            let line = tx.insert_line(NewLine {
                order_id,
                product_id,
                quantity,
            })?;
            order.push_line(line.clone());

            tx.save_product(&product)?;
            tx.save_order(&order)?;
            Ok(line)
        });

        match &result {
            Ok(line) => log::info!(
                "Added line {} to order {}: {} x product {}",
                line.id,
                order_id,
                quantity,
                product_id
            ),
            Err(e) if e.is_rejection() => log::warn!(
                "Rejected line for order {} (product {}, quantity {}): {}",
                order_id,
                product_id,
                quantity,
                e
            ),
            Err(e) => log::error!("Failed to add line to order {}: {}", order_id, e),
        }
        result
    }

    pub fn get_order(&self, order_id: i32) -> Result<Order, DomainError> {
        self.uow.transaction(|tx| {
            tx.find_order(order_id)?
                .ok_or(DomainError::NotFound(Entity::Order, order_id))
        })
    }

    pub fn get_product(&self, product_id: i32) -> Result<Product, DomainError> {
        self.uow.transaction(|tx| {
            tx.find_product(product_id)?
                .ok_or(DomainError::NotFound(Entity::Product, product_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;
    use crate::infrastructure::memory_store::InMemoryUnitOfWork;

    const SHIPPED_ORDER: i32 = 99999;
    const OPEN_ORDER: i32 = 99998;
    const AVAILABLE_PRODUCT: i32 = 93;
    const OTHER_AVAILABLE_PRODUCT: i32 = 94;
    const OUT_OF_STOCK_PRODUCT: i32 = 97;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn product(id: i32, units_in_stock: i32) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            unit_price: BigDecimal::from_str("9.50").expect("valid decimal"),
            units_in_stock,
            units_on_order: 0,
        }
    }

    fn order(id: i32, shipped_on: Option<NaiveDate>) -> Order {
        Order {
            id,
            customer_id: "ALFKI".to_string(),
            ordered_on: date(2024, 5, 2),
            shipped_on,
            lines: vec![],
        }
    }

    fn service() -> OrderLineService<InMemoryUnitOfWork> {
        OrderLineService::new(
            InMemoryUnitOfWork::new()
                .with_product(product(AVAILABLE_PRODUCT, 10))
                .with_product(product(OTHER_AVAILABLE_PRODUCT, 10))
                .with_product(product(OUT_OF_STOCK_PRODUCT, 0))
                .with_order(order(OPEN_ORDER, None))
                .with_order(order(SHIPPED_ORDER, Some(date(2024, 5, 3)))),
        )
    }

    #[test]
    fn adding_a_line_to_open_order_returns_line_with_generated_key() {
        let svc = service();

        let line = svc
            .add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, 1)
            .expect("line should be added");

        assert!(line.id > 0);
        assert_eq!(line.order_id, OPEN_ORDER);
        assert_eq!(line.product_id, AVAILABLE_PRODUCT);
        assert_eq!(line.quantity, 1);

        let product = svc.get_product(AVAILABLE_PRODUCT).expect("product exists");
        assert_eq!(product.units_in_stock, 9);
        assert_eq!(product.units_on_order, 1);
    }

    #[test]
    fn stock_and_on_order_move_by_exactly_the_quantity() {
        let svc = service();

        svc.add_order_line(OPEN_ORDER, OTHER_AVAILABLE_PRODUCT, 4)
            .expect("line should be added");

        let product = svc
            .get_product(OTHER_AVAILABLE_PRODUCT)
            .expect("product exists");
        assert_eq!(product.units_in_stock, 6);
        assert_eq!(product.units_on_order, 4);
    }

    #[test]
    fn adding_a_line_does_not_mark_the_order_shipped() {
        let svc = service();

        svc.add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, 2)
            .expect("line should be added");

        let order = svc.get_order(OPEN_ORDER).expect("order exists");
        assert_eq!(order.shipped_on, None);
        assert_eq!(order.lines.len(), 1);
    }

    #[test]
    fn lines_are_appended_in_insertion_order() {
        let svc = service();

        let first = svc
            .add_order_line(OPEN_ORDER, OTHER_AVAILABLE_PRODUCT, 1)
            .expect("first line");
        let second = svc
            .add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, 2)
            .expect("second line");
        // Still open, so a second line for the same order is accepted.
        assert_ne!(first.id, second.id);

        let order = svc.get_order(OPEN_ORDER).expect("order exists");
        assert_eq!(order.lines, vec![first, second]);
    }

    #[test]
    fn shipped_order_is_rejected_and_stock_unchanged() {
        let svc = service();

        let err = svc
            .add_order_line(SHIPPED_ORDER, AVAILABLE_PRODUCT, 3)
            .expect_err("shipped order must be rejected");

        assert!(matches!(err, DomainError::AlreadyShipped(SHIPPED_ORDER)));
        let product = svc.get_product(AVAILABLE_PRODUCT).expect("product exists");
        assert_eq!(product.units_in_stock, 10);
        assert_eq!(product.units_on_order, 0);
        assert!(svc
            .get_order(SHIPPED_ORDER)
            .expect("order exists")
            .lines
            .is_empty());
    }

    #[test]
    fn out_of_stock_product_is_rejected() {
        let svc = service();

        let err = svc
            .add_order_line(OPEN_ORDER, OUT_OF_STOCK_PRODUCT, 1)
            .expect_err("no stock left");

        assert!(matches!(
            err,
            DomainError::InsufficientStock {
                product_id: OUT_OF_STOCK_PRODUCT,
                requested: 1,
                available: 0
            }
        ));
    }

    #[test]
    fn quantity_above_stock_leaves_order_and_product_unchanged() {
        let svc = service();
        let order_before = svc.get_order(OPEN_ORDER).expect("order exists");
        let product_before = svc.get_product(AVAILABLE_PRODUCT).expect("product exists");

        let err = svc
            .add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, 11)
            .expect_err("stock is short");

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(svc.get_order(OPEN_ORDER).expect("order"), order_before);
        assert_eq!(
            svc.get_product(AVAILABLE_PRODUCT).expect("product"),
            product_before
        );
    }

    #[test]
    fn whole_stock_can_be_ordered() {
        let svc = service();

        svc.add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, 10)
            .expect("exactly the stock on hand");

        let product = svc.get_product(AVAILABLE_PRODUCT).expect("product exists");
        assert_eq!(product.units_in_stock, 0);
        assert_eq!(product.units_on_order, 10);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let svc = service();

        let err = svc
            .add_order_line(OPEN_ORDER, OTHER_AVAILABLE_PRODUCT, 0)
            .expect_err("zero quantity must be rejected");

        assert!(matches!(err, DomainError::InvalidQuantity(0)));
        assert!(svc.get_order(OPEN_ORDER).expect("order").lines.is_empty());
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let svc = service();

        let err = svc
            .add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, -2)
            .expect_err("negative quantity must be rejected");

        assert!(matches!(err, DomainError::InvalidQuantity(-2)));
        let product = svc.get_product(AVAILABLE_PRODUCT).expect("product exists");
        assert_eq!(product.units_in_stock, 10);
    }

    #[test]
    fn unknown_product_is_reported_before_unknown_order() {
        let svc = service();

        let err = svc
            .add_order_line(12345, 54321, 1)
            .expect_err("both keys are unknown");

        assert!(matches!(err, DomainError::NotFound(Entity::Product, 54321)));
    }

    #[test]
    fn unknown_order_is_not_found() {
        let svc = service();

        let err = svc
            .add_order_line(12345, AVAILABLE_PRODUCT, 1)
            .expect_err("order is unknown");

        assert!(matches!(err, DomainError::NotFound(Entity::Order, 12345)));
    }

    #[test]
    fn shipped_check_comes_before_quantity_check() {
        let svc = service();

        let err = svc
            .add_order_line(SHIPPED_ORDER, AVAILABLE_PRODUCT, 0)
            .expect_err("shipped order with zero quantity");

        assert!(matches!(err, DomainError::AlreadyShipped(SHIPPED_ORDER)));
    }

    #[test]
    fn on_order_overflow_is_a_typed_rejection_and_store_stays_usable() {
        let mut crowded = product(AVAILABLE_PRODUCT, 10);
        crowded.units_on_order = i32::MAX - 1;
        let svc = OrderLineService::new(
            InMemoryUnitOfWork::new()
                .with_product(crowded.clone())
                .with_product(product(OTHER_AVAILABLE_PRODUCT, 10))
                .with_order(order(OPEN_ORDER, None)),
        );

        let err = svc
            .add_order_line(OPEN_ORDER, AVAILABLE_PRODUCT, 5)
            .expect_err("on-order counter would overflow");
        assert!(matches!(
            err,
            DomainError::OnOrderOverflow {
                product_id: AVAILABLE_PRODUCT,
                requested: 5
            }
        ));
        assert_eq!(svc.get_product(AVAILABLE_PRODUCT).expect("product"), crowded);

        svc.add_order_line(OPEN_ORDER, OTHER_AVAILABLE_PRODUCT, 1)
            .expect("unrelated product is unaffected");
    }

    #[test]
    fn get_order_unknown_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get_order(1),
            Err(DomainError::NotFound(Entity::Order, 1))
        ));
    }
}
