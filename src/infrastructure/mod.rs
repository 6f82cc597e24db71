pub mod credentials;
pub mod errors;
pub mod models;
pub mod order_repo;
