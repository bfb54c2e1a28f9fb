//! Driven port for the parent-held saved record.
//!
//! The form reads the record at mount time and writes it on a successful
//! submit. It never owns the record.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::UserRecord;

define_port_error! {
    /// Errors raised by saved record storage.
    pub enum SavedRecordRepositoryError {
        /// Storage could not be reached.
        Unavailable { message: String } =>
            "saved record storage unavailable: {message}",
    }
}

/// Port for reading and replacing the saved record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedRecordRepository: Send + Sync {
    /// Current saved record, if one has been saved.
    async fn load(&self) -> Result<Option<UserRecord>, SavedRecordRepositoryError>;

    /// Replace the saved record.
    async fn save(&self, record: &UserRecord) -> Result<(), SavedRecordRepositoryError>;
}

/// Fixture implementation that holds nothing and accepts every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSavedRecordRepository;

#[async_trait]
impl SavedRecordRepository for FixtureSavedRecordRepository {
    async fn load(&self) -> Result<Option<UserRecord>, SavedRecordRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _record: &UserRecord) -> Result<(), SavedRecordRepositoryError> {
        Ok(())
    }
}
