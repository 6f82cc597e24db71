use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::{DomainError, OrderError};

// Postgres messages for values that do not fit their column.
const VALUE_REJECTIONS: [&str; 2] = ["value too long for type", "numeric field overflow"];

/// The database message when Postgres refused the submitted values
/// themselves rather than failing to store them.
fn rejected_value(e: &DieselError) -> Option<String> {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            Some(info.message().to_string())
        }
        DieselError::DatabaseError(_, info)
            if VALUE_REJECTIONS.iter().any(|p| info.message().starts_with(p)) =>
        {
            Some(info.message().to_string())
        }
        _ => None,
    }
}

// Any other database fault inside the order transaction is a storage failure.

impl From<DieselError> for OrderError {
    fn from(e: DieselError) -> Self {
        match rejected_value(&e) {
            Some(msg) => OrderError::InvalidRequest(msg),
            None => OrderError::StorageUnavailable(e.to_string()),
        }
    }
}

impl From<r2d2::Error> for OrderError {
    fn from(e: r2d2::Error) -> Self {
        OrderError::StorageUnavailable(e.to_string())
    }
}

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        if let Some(msg) = rejected_value(&e) {
            return DomainError::InvalidInput(msg);
        }
        match e {
            DieselError::NotFound => DomainError::NotFound("Record".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_domain_not_found() {
        let err: DomainError = DieselError::NotFound.into();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn other_diesel_errors_map_to_internal() {
        let err: DomainError = DieselError::RollbackTransaction.into();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    fn database_error(kind: DatabaseErrorKind, message: &str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(message.to_string()))
    }

    #[test]
    fn overlong_values_are_client_errors() {
        let too_long = || {
            database_error(
                DatabaseErrorKind::Unknown,
                "value too long for type character varying(100)",
            )
        };

        let err: DomainError = too_long().into();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("varying(100)")));

        let err: OrderError = too_long().into();
        assert!(matches!(err, OrderError::InvalidRequest(_)));
    }

    #[test]
    fn numeric_overflow_and_check_violations_are_client_errors() {
        let err: OrderError = database_error(
            DatabaseErrorKind::Unknown,
            "numeric field overflow",
        )
        .into();
        assert!(matches!(err, OrderError::InvalidRequest(_)));

        let err: DomainError = database_error(
            DatabaseErrorKind::CheckViolation,
            "new row for relation \"customer_reviews\" violates check constraint",
        )
        .into();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn constraint_violations_stay_conflicts() {
        let err: DomainError =
            database_error(DatabaseErrorKind::UniqueViolation, "duplicate key").into();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err: DomainError =
            database_error(DatabaseErrorKind::ForeignKeyViolation, "violates foreign key").into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn diesel_errors_are_storage_failures_for_orders() {
        let err: OrderError = DieselError::BrokenTransactionManager.into();
        assert!(matches!(err, OrderError::StorageUnavailable(_)));
    }
}
