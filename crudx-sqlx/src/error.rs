use crudx::DataError;

/// Extension trait for converting `sqlx::Error` into `DataError`.
///
/// Due to Rust's orphan rules, we can't implement `From<sqlx::Error> for
/// DataError` in this crate. Use `.into_data_error()` or map through this
/// trait instead.
pub trait AnyErrorExt {
    fn into_data_error(self) -> DataError;
}

impl AnyErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        match &self {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".into()),
            _ => DataError::database(self),
        }
    }
}

/// Convenience alias for data-layer results using `DataError`.
pub type DataResult<T> = Result<T, DataError>;
