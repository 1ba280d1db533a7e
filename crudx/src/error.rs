/// Errors that can occur in the data layer.
///
/// Store errors are carried verbatim; nothing here retries, rewrites, or
/// logs them. The conversion variants are the only errors raised locally.
#[derive(Debug)]
pub enum DataError {
    /// A single-row lookup matched zero rows.
    NotFound(String),
    /// An error surfaced from the underlying store, unmodified.
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// A `*_convert` operation ran against an entity type that does not
    /// implement the conversion capability. Carries the source type name.
    ConvertNotImplemented(&'static str),
    /// The conversion capability produced a value of an unexpected type.
    ConvertTypeMismatch {
        from: &'static str,
        to: &'static str,
    },
    /// A default-connection operation ran before the default instance
    /// was installed.
    NotInitialized,
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates to carry driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::ConvertNotImplemented(ty) => {
                write!(f, "{ty} does not implement the Convert capability")
            }
            DataError::ConvertTypeMismatch { from, to } => {
                write!(f, "Convert on {from} did not produce a {to}")
            }
            DataError::NotInitialized => {
                write!(f, "Default database connection is not initialized")
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
