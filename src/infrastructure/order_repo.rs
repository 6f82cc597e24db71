use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::OrderError;
use crate::domain::order::{
    ListResult, NewOrder, NewOrderLine, Order, OrderLine, ProductSnapshot,
};
use crate::domain::ports::{CatalogLookup, OrderStore, OrderTransaction, OrderWriter};
use crate::schema::{order_lines, orders, products};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow, ProductPriceRow};

// ── Transaction handle ────────────────────────────────────────────────────────

/// Catalog reads and order writes bound to one open Postgres transaction.
struct PgOrderTransaction<'c> {
    conn: &'c mut PgConnection,
}

impl CatalogLookup for PgOrderTransaction<'_> {
    fn get_product(&mut self, id: Uuid) -> Result<Option<ProductSnapshot>, OrderError> {
        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductPriceRow::as_select())
            .first(&mut *self.conn)
            .optional()?;
        Ok(row.map(ProductSnapshot::from))
    }
}

impl OrderWriter for PgOrderTransaction<'_> {
    fn insert_order(&mut self, order: &NewOrder) -> Result<Order, OrderError> {
        let row = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: Uuid::new_v4(),
                customer_name: &order.customer.name,
                customer_email: &order.customer.email,
                total_amount: order.total_amount.clone(),
                status: &order.status,
            })
            .returning(OrderRow::as_returning())
            .get_result(&mut *self.conn)?;
        Ok(row.into_order(vec![]))
    }

    fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLine, OrderError> {
        let row = diesel::insert_into(order_lines::table)
            .values(&NewOrderLineRow {
                id: Uuid::new_v4(),
                order_id: line.order_id,
                line_number: line.line_number,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price.clone(),
            })
            .returning(OrderLineRow::as_returning())
            .get_result(&mut *self.conn)?;
        Ok(row.into())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Loads the lines of `rows` in one query and attaches them in line order.
fn with_lines(conn: &mut PgConnection, rows: Vec<OrderRow>) -> QueryResult<Vec<Order>> {
    let lines = OrderLineRow::belonging_to(&rows)
        .select(OrderLineRow::as_select())
        .order(order_lines::line_number.asc())
        .load(conn)?;

    Ok(lines
        .grouped_by(&rows)
        .into_iter()
        .zip(rows)
        .map(|(lines, order)| order.into_order(lines))
        .collect())
}

impl OrderStore for DieselOrderStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, OrderError>
    where
        F: FnOnce(&mut dyn OrderTransaction) -> Result<T, OrderError>,
    {
        let mut conn = self.pool.get()?;

        // Repeatable read pins every price lookup to one snapshot.
        conn.build_transaction()
            .repeatable_read()
            .run(|conn| f(&mut PgOrderTransaction { conn }))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrderError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(with_lines(&mut conn, vec![order])?.pop())
    }

    fn list(&self, skip: i64, limit: i64) -> Result<ListResult, OrderError> {
        let mut conn = self.pool.get()?;

        // One snapshot for the count and the page.
        conn.build_transaction().repeatable_read().run::<_, OrderError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .limit(limit)
                .offset(skip)
                .load(conn)?;

            Ok(ListResult {
                items: with_lines(conn, rows)?,
                total,
            })
        })
    }

    fn list_by_customer(&self, email: &str) -> Result<Vec<Order>, OrderError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::customer_email.eq(email))
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.asc()))
            .load(&mut conn)?;

        Ok(with_lines(&mut conn, rows)?)
    }
}
