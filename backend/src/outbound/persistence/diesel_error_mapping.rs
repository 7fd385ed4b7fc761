//! Classify Diesel and pool failures before repositories map them onto
//! their port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to what the ports care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The database could not be reached or dropped the connection.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Anything else.
    Query(String),
}

/// Message carried by a pool error.
pub(crate) fn pool_failure_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify `error`, logging the raw cause at debug level for `operation`.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => debug!(error = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection(format!("{operation}: database connection closed"))
        }
        DieselError::NotFound => StoreFailure::Query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => {
            StoreFailure::Query(format!("{operation}: invalid query"))
        }
        _ => StoreFailure::Query(format!("{operation}: database error")),
    }
}

/// Convert a row count returned by PostgreSQL into `u64`.
pub(crate) fn count_from_db(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_messages_are_unwrapped() {
        assert_eq!(pool_failure_message(PoolError::checkout("timed out")), "timed out");
    }

    #[rstest]
    #[case(DieselError::NotFound, StoreFailure::Query("find: record not found".into()))]
    #[case(DieselError::RollbackTransaction, StoreFailure::Query("find: database error".into()))]
    fn non_database_errors_become_query_failures(
        #[case] error: DieselError,
        #[case] expected: StoreFailure,
    ) {
        assert_eq!(classify_diesel_error(error, "find"), expected);
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(7, 7)]
    fn counts_clamp_negatives(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(count_from_db(raw), expected);
    }
}
