use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::errors::{LinkmapError, Result};
use crate::storage::LinkData;

pub mod file;
pub mod memory;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Durable home for the store's contents.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Read the last saved record. A backend that has never been written
    /// returns an empty record; unreadable state is an error.
    async fn load(&self) -> Result<LinkData>;

    /// Overwrite the stored record with `data`.
    async fn save(&self, data: &LinkData) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

/// Pick a backend by `store.backend`.
pub fn create_backend(config: &StoreConfig) -> Result<Arc<dyn PersistenceBackend>> {
    let backend: Arc<dyn PersistenceBackend> = match config.backend.as_str() {
        "file" => Arc::new(JsonFileBackend::new(&config.data_file)),
        "memory" => Arc::new(MemoryBackend::new()),
        other => {
            return Err(LinkmapError::config(format!(
                "unknown persistence backend '{}', expected 'file' or 'memory'",
                other
            )));
        }
    };
    info!("Using persistence backend: {}", backend.backend_name());
    Ok(backend)
}

/// Load prior state, falling back to an empty record on any failure.
pub async fn load_or_empty(backend: &dyn PersistenceBackend) -> LinkData {
    match backend.load().await {
        Ok(data) => data,
        Err(e) => {
            warn!(
                "Failed to load state from {} backend, starting empty: {}",
                backend.backend_name(),
                e
            );
            LinkData::new()
        }
    }
}
