use std::borrow::Cow;

pub mod memory;

pub use memory::MemoryStore;

/// Sentinels reported by every repository backend. Services translate these
/// into [`crate::api::error::SystemError`] at each call site.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists: {0}")]
    AlreadyExists(Cow<'static, str>),
    #[error("referenced record does not exist: {0}")]
    ForeignKey(Cow<'static, str>),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return StoreError::NotFound;
        }
        if let sqlx::Error::Database(db_err) = &err {
            let constraint: Cow<'static, str> =
                db_err.constraint().map(|c| c.to_string().into()).unwrap_or("unknown".into());
            match db_err.code().as_deref() {
                Some("23505") => return StoreError::AlreadyExists(constraint),
                Some("23503") => return StoreError::ForeignKey(constraint),
                _ => log::debug!("Unhandled DB error: {:?}", db_err),
            }
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound));
    }

    #[test]
    fn test_other_sqlx_errors_are_kept() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(sqlx::Error::PoolTimedOut)));
    }
}
