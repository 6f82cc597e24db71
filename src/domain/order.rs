use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::OrderError;
use super::ports::CatalogLookup;

pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A product as observed by the order transaction.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub price: BigDecimal,
    pub is_available: bool,
}

/// A requested line with the unit price captured at order time.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl PricedLine {
    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: Customer,
    pub total_amount: BigDecimal,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub order_id: Uuid,
    pub line_number: i32,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub line_number: i32,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer: Customer,
    pub total_amount: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}

/// Longest customer name or email an order can carry.
pub const MAX_CUSTOMER_FIELD_LEN: usize = 100;

/// Order totals must stay strictly below this amount (ten billion).
const TOTAL_CEILING: i64 = 10_000_000_000;

fn check_length(field: &str, value: &str) -> Result<(), OrderError> {
    let len = value.chars().count();
    if len > MAX_CUSTOMER_FIELD_LEN {
        return Err(OrderError::InvalidRequest(format!(
            "{} must be at most {} characters, got {}",
            field, MAX_CUSTOMER_FIELD_LEN, len
        )));
    }
    Ok(())
}

/// Rejects malformed requests before any store access happens.
pub fn validate_request(customer: &Customer, lines: &[OrderLineRequest]) -> Result<(), OrderError> {
    if customer.name.trim().is_empty() {
        return Err(OrderError::InvalidRequest(
            "customer_name must not be empty".to_string(),
        ));
    }
    if !customer.email.contains('@') {
        return Err(OrderError::InvalidRequest(format!(
            "customer_email '{}' is not a valid email",
            customer.email
        )));
    }
    check_length("customer_name", &customer.name)?;
    check_length("customer_email", &customer.email)?;
    if lines.is_empty() {
        return Err(OrderError::InvalidRequest(
            "an order needs at least one line".to_string(),
        ));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity < 1) {
        return Err(OrderError::InvalidRequest(format!(
            "quantity for product {} must be at least 1, got {}",
            line.product_id, line.quantity
        )));
    }
    Ok(())
}

/// Resolves every requested product and captures its price.
///
/// All lookups finish before the caller writes anything. A product that
/// appears more than once is looked up once, so every entry for it carries
/// the same observed price.
pub fn price_lines<C>(
    catalog: &mut C,
    lines: &[OrderLineRequest],
) -> Result<Vec<PricedLine>, OrderError>
where
    C: CatalogLookup + ?Sized,
{
    let mut observed: HashMap<Uuid, BigDecimal> = HashMap::new();
    let mut priced = Vec::with_capacity(lines.len());

    for line in lines {
        let unit_price = match observed.get(&line.product_id) {
            Some(price) => price.clone(),
            None => {
                let product = catalog
                    .get_product(line.product_id)?
                    .ok_or(OrderError::ProductNotFound(line.product_id))?;
                if !product.is_available {
                    log::warn!("Product {} is ordered while marked unavailable", product.id);
                }
                observed.insert(product.id, product.price.clone());
                product.price
            }
        };
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
        });
    }

    Ok(priced)
}

/// Rejects totals too large to be stored as an order amount.
pub fn check_total(total: &BigDecimal) -> Result<(), OrderError> {
    if *total >= BigDecimal::from(TOTAL_CEILING) {
        return Err(OrderError::InvalidRequest(format!(
            "order total {} exceeds the maximum order amount",
            total
        )));
    }
    Ok(())
}

/// Sums line subtotals in request order.
pub fn order_total(lines: &[PricedLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::from(0), |acc, line| acc + line.subtotal())
}
