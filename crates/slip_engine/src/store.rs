use slip_core::PaymentRecord;
use slip_logging::{slip_debug, slip_warn};
use thiserror::Error;

use crate::persist::PersistError;
use crate::storage::KeyValueStore;

/// Fixed key the local record lives under.
pub const STORAGE_KEY: &str = "uplatimi-data";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage access failed: {0}")]
    Io(#[from] PersistError),
    #[error("stored payment record is unreadable: {0}")]
    Parse(serde_json::Error),
    #[error("failed to serialize payment record: {0}")]
    Serialize(serde_json::Error),
}

/// Loads and saves the local [`PaymentRecord`] in a [`KeyValueStore`].
pub struct RecordStore<S> {
    backend: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the local record. Missing or unreadable data yields the default record.
    pub fn load(&self) -> PaymentRecord {
        match self.try_load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                slip_debug!("No stored payment record; starting from defaults");
                PaymentRecord::default()
            }
            Err(err) => {
                slip_warn!("Falling back to default payment record: {}", err);
                PaymentRecord::default()
            }
        }
    }

    /// Like [`RecordStore::load`], but reports why nothing usable was found.
    ///
    /// A parsed record is sanitized, so hand-edited or older stored data still
    /// obeys the amount grammar and field limits.
    pub fn try_load(&self) -> Result<Option<PaymentRecord>, StorageError> {
        let Some(text) = self.backend.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        let record: PaymentRecord = serde_json::from_str(&text).map_err(StorageError::Parse)?;
        Ok(Some(record.sanitized()))
    }

    /// Serialize `record`, strip diacritics from the whole serialized form, and write it.
    pub fn save(&self, record: &PaymentRecord) -> Result<(), StorageError> {
        let json = record.to_storage_json().map_err(StorageError::Serialize)?;
        self.backend.set(STORAGE_KEY, &json)?;
        Ok(())
    }
}
