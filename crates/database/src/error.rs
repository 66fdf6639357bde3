use chrono::NaiveDateTime;
use thiserror::Error;

/// Driver error type.
///
/// An unpopulated series reads as `Ok` with an empty value; only a failing
/// store or a caller-side precondition violation surfaces as `Err`. The
/// lenient accessors on [`crate::BarStore`] collapse both into empty values
/// for callers that only check emptiness.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The interval sentinel was rejected before any I/O.
    #[error("invalid bar interval")]
    InvalidInterval,
    /// Date bounds must satisfy `start < end` with `start` inside the
    /// store's `DATETIME` domain.
    #[error("invalid date range: {start} .. {end}")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// True when the error means the series simply is not there yet:
/// ER_NO_SUCH_TABLE (1146) or ER_BAD_DB_ERROR (1049, the schema half of the
/// dotted identifier). A not-yet-populated series is expected steady state,
/// not a fault.
pub(crate) fn is_missing_series(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql) = db.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>() {
            return matches!(mysql.number(), 1146 | 1049);
        }
    }
    false
}
