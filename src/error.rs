use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("libsql error")]
    Libsql(#[from] libsql::Error),
    #[error("duplicate light index {0}")]
    DuplicateIndex(i64),
    #[error("malformed row: {0}")]
    MalformedRow(String),
    #[error("light {0} missing right after insert")]
    MissingAfterInsert(i64),
    #[error("replica sync failed")]
    Sync(#[source] libsql::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("ValidationError: {0}")]
    Validation(String),
    #[error("StoreError")]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, RegistryError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_keeps_its_source_in_the_chain() {
        let err = RegistryError::from(StoreError::DuplicateIndex(3));
        assert_eq!(crate::unpack_error(&err), "StoreError: duplicate light index 3");
        assert!(!err.is_validation());
    }

    #[test]
    fn sync_failure_keeps_the_libsql_cause() {
        let err = StoreError::Sync(libsql::Error::ConnectionFailed("primary offline".into()));
        assert!(std::error::Error::source(&err).is_some());

        let message = crate::unpack_error(&err);
        assert!(message.starts_with("replica sync failed: "), "{message}");
        assert!(message.contains("primary offline"), "{message}");
    }

    #[test]
    fn validation_is_reported_as_is() {
        let err = RegistryError::Validation("name is required".into());
        assert_eq!(crate::unpack_error(&err), "ValidationError: name is required");
        assert!(err.is_validation());
    }
}
