use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{Customer, Order, OrderLine, OrderLineRequest};
use crate::errors::AppError;
use crate::handlers::Pagination;
use crate::AppOrderService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Prices are never accepted from the client; they are read from the catalog.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub line_number: i32,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price captured when the order was placed, e.g. "2.50"
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    /// Decimal total as a string, e.g. "9.00"
    pub total_amount: String,
    pub status: String,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

pub(crate) fn money(amount: &BigDecimal) -> String {
    amount.with_scale(2).to_string()
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            id: line.id,
            line_number: line.line_number,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: money(&line.unit_price),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer.name,
            customer_email: order.customer.email,
            total_amount: money(&order.total_amount),
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
            lines: order.lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl CreateOrderRequest {
    fn into_parts(self) -> (Customer, Vec<OrderLineRequest>) {
        let customer = Customer {
            name: self.customer_name,
            email: self.customer_email,
        };
        let lines = self
            .items
            .into_iter()
            .map(|item| OrderLineRequest {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect();
        (customer, lines)
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places an order. Every item is priced from the catalog and the order is
/// stored together with its lines in a single transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty order, bad quantity or bad customer"),
        (status = 404, description = "A requested product does not exist"),
        (status = 503, description = "Storage unavailable"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let (customer, lines) = body.into_inner().into_parts();

    let order = web::block(move || service.place_order(customer, lines))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
///
/// Returns the order together with its lines.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound("Order not found".to_string())),
    }
}

/// GET /orders
///
/// Returns orders newest first, with their lines.
#[utoipa::path(
    get,
    path = "/orders",
    params(Pagination),
    responses(
        (status = 200, description = "Page of orders", body = ListOrdersResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<AppOrderService>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let result = web::block(move || service.list_orders(skip, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        skip,
        limit,
    }))
}

/// GET /orders/customer/{email}
#[utoipa::path(
    get,
    path = "/orders/customer/{email}",
    params(
        ("email" = String, Path, description = "Customer email"),
    ),
    responses(
        (status = 200, description = "The customer's orders, newest first", body = [OrderResponse]),
    ),
    tag = "orders"
)]
pub async fn list_customer_orders(
    service: web::Data<AppOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    let orders = web::block(move || service.list_customer_orders(&email))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}
