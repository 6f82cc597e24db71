use uuid::Uuid;

use super::errors::{DomainError, OrderError};
use super::order::{ListResult, NewOrder, NewOrderLine, Order, OrderLine, ProductSnapshot};

/// Resolves product identifiers to their current price and availability.
pub trait CatalogLookup {
    fn get_product(&mut self, id: Uuid) -> Result<Option<ProductSnapshot>, OrderError>;
}

/// Writes order records. The returned `Order` carries no lines.
pub trait OrderWriter {
    fn insert_order(&mut self, order: &NewOrder) -> Result<Order, OrderError>;
    fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLine, OrderError>;
}

/// Reads and writes that share one storage transaction.
pub trait OrderTransaction: CatalogLookup + OrderWriter {}

impl<T: CatalogLookup + OrderWriter> OrderTransaction for T {}

pub trait OrderStore: Send + Sync + 'static {
    /// Runs `f` inside a single transaction. `Ok` commits, `Err` rolls back
    /// before the error is handed back to the caller.
    fn transaction<T, F>(&self, f: F) -> Result<T, OrderError>
    where
        F: FnOnce(&mut dyn OrderTransaction) -> Result<T, OrderError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, OrderError>;
    fn list(&self, skip: i64, limit: i64) -> Result<ListResult, OrderError>;
    fn list_by_customer(&self, email: &str) -> Result<Vec<Order>, OrderError>;
}

/// Hashes secrets before they are stored and checks candidates against them.
pub trait SecretHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, DomainError>;
    fn verify(&self, secret: &str, stored: &str) -> bool;
}

/// Issues bearer tokens for an authenticated identity.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &str) -> Result<String, DomainError>;
}
