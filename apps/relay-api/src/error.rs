use std::error::Error;
use std::fmt;

use diesel_async::pooled_connection::deadpool::PoolError;

/// Storage-layer failure: pool checkout or query execution.
///
/// These never surface to clients. Every caller logs and degrades (history
/// skipped, message delivered live but unsaved), so the type only needs to
/// render a useful log line.
#[derive(Debug)]
pub enum StoreError {
    Pool(PoolError),
    Query(diesel::result::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Pool(err) => write!(f, "connection pool error: {err}"),
            StoreError::Query(err) => write!(f, "query error: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Pool(err) => Some(err),
            StoreError::Query(err) => Some(err),
        }
    }
}

impl From<PoolError> for StoreError {
    fn from(err: PoolError) -> Self {
        StoreError::Pool(err)
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        StoreError::Query(err)
    }
}
