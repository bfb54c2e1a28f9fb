//! Process-memory storage for the parent-held saved record.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::UserRecord;
use crate::domain::ports::{SavedRecordRepository, SavedRecordRepositoryError};

/// Holds at most one saved record for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySavedRecordRepository {
    record: Mutex<Option<UserRecord>>,
}

impl InMemorySavedRecordRepository {
    /// Start with `record` already saved.
    pub fn seeded(record: UserRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

fn poisoned<T>(_: T) -> SavedRecordRepositoryError {
    SavedRecordRepositoryError::unavailable("saved record lock poisoned")
}

#[async_trait]
impl SavedRecordRepository for InMemorySavedRecordRepository {
    async fn load(&self) -> Result<Option<UserRecord>, SavedRecordRepositoryError> {
        let guard = self.record.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save(&self, record: &UserRecord) -> Result<(), SavedRecordRepositoryError> {
        let mut guard = self.record.lock().map_err(poisoned)?;
        *guard = Some(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormFields;

    fn record(given_name: &str) -> UserRecord {
        UserRecord {
            fields: FormFields {
                given_name: given_name.into(),
                ..FormFields::default()
            },
            coordinates: None,
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let repository = InMemorySavedRecordRepository::default();
        assert_eq!(repository.load().await, Ok(None));
    }

    #[tokio::test]
    async fn save_replaces_previous_record() {
        let repository = InMemorySavedRecordRepository::seeded(record("Ada"));
        repository.save(&record("Grace")).await.expect("save");
        assert_eq!(repository.load().await, Ok(Some(record("Grace"))));
    }
}
