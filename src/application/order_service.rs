use uuid::Uuid;

use crate::domain::errors::OrderError;
use crate::domain::order::{
    check_total, order_total, price_lines, validate_request, Customer, ListResult, NewOrder,
    NewOrderLine, Order, OrderLineRequest, STATUS_PENDING,
};
use crate::domain::ports::{OrderStore, OrderWriter};

pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates, prices and persists an order with its lines as one unit.
    ///
    /// Malformed requests fail before the store is touched. Every product is
    /// resolved before the first insert, and any failure after the
    /// transaction opens rolls it back, so callers never see a partial order.
    pub fn place_order(
        &self,
        customer: Customer,
        lines: Vec<OrderLineRequest>,
    ) -> Result<Order, OrderError> {
        if let Err(e) = validate_request(&customer, &lines) {
            log::warn!("Rejected order for {}: {}", customer.email, e);
            return Err(e);
        }

        let result = self.store.transaction(|txn| {
            let priced = price_lines(&mut *txn, &lines)?;
            let total_amount = order_total(&priced);
            check_total(&total_amount)?;

            let mut order = txn.insert_order(&NewOrder {
                customer: customer.clone(),
                total_amount,
                status: STATUS_PENDING.to_string(),
            })?;

            for (line_number, line) in (1..).zip(&priced) {
                let stored = txn.insert_line(&NewOrderLine {
                    order_id: order.id,
                    line_number,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price.clone(),
                })?;
                order.lines.push(stored);
            }

            Ok(order)
        });

        match &result {
            Ok(order) => log::info!(
                "Placed order {} for {} ({} lines, total {})",
                order.id,
                order.customer.email,
                order.lines.len(),
                order.total_amount
            ),
            Err(OrderError::StorageUnavailable(reason)) => {
                log::error!("Order for {} rolled back: {}", customer.email, reason)
            }
            Err(e) => log::warn!("Rejected order for {}: {}", customer.email, e),
        }

        result
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<Order>, OrderError> {
        self.store.find_by_id(id)
    }

    pub fn list_orders(&self, skip: i64, limit: i64) -> Result<ListResult, OrderError> {
        self.store.list(skip, limit)
    }

    pub fn list_customer_orders(&self, email: &str) -> Result<Vec<Order>, OrderError> {
        self.store.list_by_customer(email)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::OrderService;
    use crate::domain::errors::OrderError;
    use crate::domain::order::{Customer, Order, OrderLineRequest};
    use crate::testing::{dec, InMemoryOrderStore};

    fn customer() -> Customer {
        Customer {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
        }
    }

    fn line(product_id: Uuid, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            product_id,
            quantity,
        }
    }

    fn lines_total(order: &Order) -> BigDecimal {
        order
            .lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| {
                acc + &l.unit_price * BigDecimal::from(l.quantity)
            })
    }

    #[test]
    fn places_example_order_with_captured_prices() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[
            (a, "2.50"),
            (b, "4.00"),
        ]));

        let order = service
            .place_order(customer(), vec![line(a, 2), line(b, 1)])
            .expect("order placed");

        assert_eq!(order.total_amount, dec("9.00"));
        assert_eq!(order.status, "pending");
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].product_id, a);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.lines[0].unit_price, dec("2.50"));
        assert_eq!(order.lines[1].product_id, b);
        assert_eq!(order.lines[1].quantity, 1);
        assert_eq!(order.lines[1].unit_price, dec("4.00"));
        assert_eq!(lines_total(&order), order.total_amount);
    }

    #[test]
    fn unknown_product_leaves_store_untouched() {
        let a = Uuid::new_v4();
        let z = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[(a, "2.50")]));

        let err = service
            .place_order(customer(), vec![line(a, 2), line(z, 1)])
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductNotFound(id) if id == z));
        assert_eq!(service.store.order_count(), 0);
        assert_eq!(service.store.line_count(), 0);
    }

    #[test]
    fn empty_request_never_reaches_the_store() {
        let service = OrderService::new(InMemoryOrderStore::default());

        let err = service.place_order(customer(), vec![]).unwrap_err();

        assert!(matches!(err, OrderError::InvalidRequest(_)));
        assert_eq!(service.store.transactions(), 0);
    }

    #[test]
    fn non_positive_quantity_rejects_whole_request() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[
            (a, "1.00"),
            (b, "1.00"),
        ]));

        let err = service
            .place_order(customer(), vec![line(a, 1), line(b, 0)])
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidRequest(_)));
        assert_eq!(service.store.transactions(), 0);
        assert_eq!(service.store.order_count(), 0);
    }

    #[test]
    fn overlong_customer_name_is_a_client_error() {
        let a = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[(a, "1.00")]));
        let customer = Customer {
            name: "n".repeat(101),
            ..customer()
        };

        let err = service.place_order(customer, vec![line(a, 1)]).unwrap_err();

        assert!(matches!(err, OrderError::InvalidRequest(_)));
        assert_eq!(service.store.transactions(), 0);
    }

    #[test]
    fn unstorable_total_is_rejected_without_writes() {
        let a = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[(a, "10.00")]));

        let err = service
            .place_order(customer(), vec![line(a, i32::MAX)])
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidRequest(_)));
        assert_eq!(service.store.order_count(), 0);
        assert_eq!(service.store.line_count(), 0);
    }

    #[test]
    fn storage_failure_mid_write_rolls_back_everything() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let store =
            InMemoryOrderStore::with_products(&[(a, "2.00"), (b, "3.00")]).failing_on_line(2);
        let service = OrderService::new(store);

        let err = service
            .place_order(customer(), vec![line(a, 1), line(b, 1)])
            .unwrap_err();

        assert!(matches!(err, OrderError::StorageUnavailable(_)));
        assert_eq!(service.store.order_count(), 0);
        assert_eq!(service.store.line_count(), 0);
    }

    #[test]
    fn duplicate_entries_are_not_merged() {
        let a = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[(a, "1.75")]));

        let order = service
            .place_order(customer(), vec![line(a, 1), line(a, 3)])
            .expect("order placed");

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].line_number, 1);
        assert_eq!(order.lines[1].line_number, 2);
        assert_eq!(order.total_amount, dec("7.00"));
    }

    #[test]
    fn later_price_change_does_not_touch_history() {
        let a = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[(a, "2.50")]));

        let order = service
            .place_order(customer(), vec![line(a, 4)])
            .expect("order placed");
        service.store.set_price(a, "3.10");

        let stored = service
            .get_order(order.id)
            .expect("lookup")
            .expect("order exists");
        assert_eq!(stored.total_amount, dec("10.00"));
        assert_eq!(stored.lines[0].unit_price, dec("2.50"));
    }

    #[test]
    fn concurrent_orders_record_one_consistent_price() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let service = Arc::new(OrderService::new(InMemoryOrderStore::with_products(&[
            (a, "2.00"),
            (b, "5.00"),
        ])));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        service.store.set_price(a, "2.40");
                    }
                    service
                        .place_order(customer(), vec![line(a, 2), line(b, 1), line(a, 1)])
                        .expect("order placed")
                })
            })
            .collect();

        for handle in handles {
            let order = handle.join().expect("thread finished");
            let first = &order.lines[0].unit_price;
            assert!(*first == dec("2.00") || *first == dec("2.40"));
            assert_eq!(&order.lines[2].unit_price, first);
            assert_eq!(lines_total(&order), order.total_amount);
        }
        assert_eq!(service.store.order_count(), 8);
        assert_eq!(service.store.line_count(), 24);
    }

    #[test]
    fn lists_orders_newest_first_and_by_customer() {
        let a = Uuid::new_v4();
        let service = OrderService::new(InMemoryOrderStore::with_products(&[(a, "1.00")]));
        let other = Customer {
            name: "Linus".to_string(),
            email: "linus@example.com".to_string(),
        };

        let first = service
            .place_order(customer(), vec![line(a, 1)])
            .expect("first");
        service
            .place_order(other, vec![line(a, 2)])
            .expect("second");
        let third = service
            .place_order(customer(), vec![line(a, 3)])
            .expect("third");

        let page = service.list_orders(0, 2).expect("list");
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, third.id);

        let mine = service
            .list_customer_orders("grace@example.com")
            .expect("customer orders");
        let ids: Vec<_> = mine.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);
    }
}
