//! Payment-slip engine: durable storage of the local record and the link
//! shortening client.
mod persist;
mod shorten;
mod storage;
mod store;
mod types;

pub use persist::{ensure_storage_dir, PersistError, RecordDir};
pub use shorten::{
    generate_keyword, keyword_from_timestamp, request_body, LinkShortener, ShortenSettings,
    YourlsShortener, DEFAULT_ENDPOINT,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{RecordStore, StorageError, STORAGE_KEY};
pub use types::{FailureKind, ShortenError};
