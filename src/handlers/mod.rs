pub mod catalog;
pub mod geography;
pub mod identity;
pub mod orders;

use actix_web::web;
use diesel::pg::PgConnection;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::errors::AppError;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 100;

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of records to skip. Defaults to 0.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of records to return. Defaults to 100, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Pagination {
    /// Returns `(skip, limit)` clamped to the accepted range.
    pub fn bounds(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(1, MAX_LIMIT))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Runs `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn with_conn<T, F>(pool: web::Data<DbPool>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let result = web::block(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(result?)
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

pub(crate) fn require_email(field: &str, value: &str) -> Result<(), DomainError> {
    require(field, value)?;
    if !value.contains('@') {
        return Err(DomainError::InvalidInput(format!(
            "{} '{}' is not a valid email",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let p = Pagination {
            skip: -5,
            limit: 1000,
        };
        assert_eq!(p.bounds(), (0, 100));

        let p = Pagination { skip: 3, limit: 0 };
        assert_eq!(p.bounds(), (3, 1));
    }

    #[test]
    fn pagination_defaults_from_empty_query() {
        let p: Pagination = serde_json::from_str("{}").expect("defaults");
        assert_eq!(p.bounds(), (0, 100));
    }

    #[test]
    fn require_rejects_blank_values() {
        assert!(require("name", "Mocha").is_ok());
        assert!(matches!(
            require("name", "   "),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn require_email_needs_an_at_sign() {
        assert!(require_email("email", "a@b.co").is_ok());
        assert!(require_email("email", "ab.co").is_err());
        assert!(require_email("email", "").is_err());
    }
}
