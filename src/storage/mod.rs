pub mod memory_storage;
pub mod metadata;
pub mod mutate;
pub mod storage_client;

pub use memory_storage::MemoryStorage;
pub use metadata::{MemorySchemaManager, SchemaManager};
pub use mutate::{BatchExecutor, BatchOutcome, BatchUpdateProcessor};
pub use storage_client::{StorageClient, StorageStats};

pub use crate::core::StorageError;
