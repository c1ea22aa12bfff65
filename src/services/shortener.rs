//! Shortener service
//!
//! The two operations the outer layers (HTTP, CLI) consume: `shorten` a long
//! value into a code and `resolve` a code back. Owns the store, the code
//! generator and the background persistence writer.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::errors::{LinkmapError, Result};
use crate::persistence::{PersistenceBackend, PersistenceWriter, create_backend, load_or_empty};
use crate::storage::LinkStore;
use crate::utils::{CodeGenerator, GeneratorPolicy};

const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    pub entries: usize,
    pub saves_completed: u64,
    pub saves_failed: u64,
    pub backend: &'static str,
}

pub struct ShortenerService {
    store: Arc<LinkStore>,
    generator: CodeGenerator,
    writer: PersistenceWriter,
    shutdown_timeout: Duration,
}

impl ShortenerService {
    /// Build the service from configuration: pick the backend, load prior
    /// state (empty on any load failure) and start the writer.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let backend = create_backend(config)?;
        let data = load_or_empty(backend.as_ref()).await;
        let store = Arc::new(LinkStore::from_data(data));
        let generator = CodeGenerator::new(GeneratorPolicy::from_config(config))?;

        Ok(Self::with_parts(store, generator, backend)
            .with_shutdown_timeout(Duration::from_secs(config.shutdown_timeout_secs)))
    }

    /// Assemble a service from already-built parts.
    pub fn with_parts(
        store: Arc<LinkStore>,
        generator: CodeGenerator,
        backend: Arc<dyn PersistenceBackend>,
    ) -> Self {
        let writer = PersistenceWriter::spawn(Arc::clone(&store), backend);
        Self {
            store,
            generator,
            writer,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Return the code for `url`, assigning a new one on first sight.
    ///
    /// Repeated calls with the same value return the same code. A new entry
    /// schedules a background save; the save is not awaited.
    pub fn shorten(&self, url: &str) -> Result<String> {
        if let Some(code) = self.store.lookup_by_value(url) {
            debug!("Existing code '{}' for {}", code, url);
            return Ok(code);
        }

        let (code, created) = self
            .store
            .get_or_insert_with(url, |exists| self.generator.next(exists))
            .inspect_err(|e| {
                if e.is_internal() {
                    error!("Store invariant violated while shortening {}: {}", url, e);
                } else {
                    warn!("Could not shorten {}: {}", url, e);
                }
            })?;

        if created {
            info!("Assigned code '{}' to {}", code, url);
            self.writer.schedule_save();
        }
        Ok(code)
    }

    /// Look up the long value behind `code`.
    pub fn resolve(&self, code: &str) -> Result<String> {
        self.store
            .lookup_by_code(code)
            .ok_or_else(|| LinkmapError::not_found(format!("code '{}' is not assigned", code)))
    }

    pub fn store(&self) -> &Arc<LinkStore> {
        &self.store
    }

    pub fn stats(&self) -> ServiceStats {
        let persistence = self.writer.stats();
        ServiceStats {
            entries: self.store.len(),
            saves_completed: persistence.saves_completed,
            saves_failed: persistence.saves_failed,
            backend: self.writer.backend_name(),
        }
    }

    /// Wait for every save scheduled so far.
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }

    /// Final flush and writer shutdown, bounded by the shutdown timeout.
    pub async fn shutdown(&self) -> Result<()> {
        match timeout(self.shutdown_timeout, self.writer.shutdown()).await {
            Ok(result) => result,
            Err(_) => {
                error!("Final flush timed out after {:?}", self.shutdown_timeout);
                Err(LinkmapError::file_operation(format!(
                    "final flush timed out after {:?}",
                    self.shutdown_timeout
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use crate::storage::LinkData;
    use async_trait::async_trait;

    /// Backend whose saves take longer than any test timeout.
    struct StalledBackend;

    #[async_trait]
    impl PersistenceBackend for StalledBackend {
        async fn load(&self) -> Result<LinkData> {
            Ok(LinkData::new())
        }

        async fn save(&self, _data: &LinkData) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "stalled"
        }
    }

    fn service() -> ShortenerService {
        ShortenerService::with_parts(
            Arc::new(LinkStore::new()),
            CodeGenerator::with_seed(GeneratorPolicy::default(), 11).unwrap(),
            Arc::new(MemoryBackend::new()),
        )
    }

    #[tokio::test]
    async fn test_shorten_is_idempotent() {
        let svc = service();
        let first = svc.shorten("http://example.com").unwrap();
        let second = svc.shorten("http://example.com").unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.stats().entries, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let svc = service();
        let err = svc.resolve("zz").unwrap_err();
        assert!(matches!(err, LinkmapError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stats_reports_backend() {
        let svc = service();
        svc.shorten("http://example.com").unwrap();
        svc.flush().await.unwrap();

        let stats = svc.stats();
        assert_eq!(stats.backend, "memory");
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.saves_completed, 1);
        assert_eq!(stats.saves_failed, 0);
    }

    #[tokio::test]
    async fn test_shutdown_times_out_on_stalled_backend() {
        let svc = ShortenerService::with_parts(
            Arc::new(LinkStore::new()),
            CodeGenerator::with_seed(GeneratorPolicy::default(), 11).unwrap(),
            Arc::new(StalledBackend),
        )
        .with_shutdown_timeout(Duration::from_millis(50));
        svc.shorten("http://example.com").unwrap();

        let started = std::time::Instant::now();
        let err = svc.shutdown().await.unwrap_err();
        assert!(matches!(err, LinkmapError::FileOperation(_)));
        assert!(err.message().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
