use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::PersistenceBackend;
use crate::errors::{LinkmapError, Result};
use crate::storage::LinkData;

/// Keeps the last saved record in process memory. Nothing survives a
/// restart; useful for ephemeral runs and tests.
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<Option<LinkData>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a record as if it had been saved earlier.
    pub fn with_data(data: LinkData) -> Self {
        Self {
            data: Mutex::new(Some(data)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail with a file operation error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn last_saved(&self) -> Option<LinkData> {
        self.data.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn load(&self) -> Result<LinkData> {
        Ok(self.data.lock().clone().unwrap_or_default())
    }

    async fn save(&self, data: &LinkData) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LinkmapError::file_operation("memory backend rejected save"));
        }
        *self.data.lock() = Some(data.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
