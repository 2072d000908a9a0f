use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Write or lookup matched no row
    #[error("record not found")]
    NotFound,

    #[error("failed to {operation}, error: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid value stored in {column}: {value}")]
    Corrupt { column: &'static str, value: String },
}

impl StoreError {
    /// Closure for `map_err` that tags a driver error with the failed operation.
    pub fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
        move |source| StoreError::Query { operation, source }
    }
}

/// Decode one column, reporting failures as store errors.
pub(super) fn column<'r, T>(row: &'r PgRow, name: &'static str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(StoreError::query("decode row"))
}
