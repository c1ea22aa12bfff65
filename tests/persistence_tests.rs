//! Persistence tests
//!
//! File backend round trips and restart behavior of the service.

use std::fs;
use std::sync::Arc;

use linkmap::config::StoreConfig;
use linkmap::persistence::{JsonFileBackend, MemoryBackend, PersistenceBackend, load_or_empty};
use linkmap::services::ShortenerService;
use linkmap::storage::{Entry, LinkData, LinkStore};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> StoreConfig {
    StoreConfig {
        data_file: dir.path().join("urls.json").to_string_lossy().into_owned(),
        ..Default::default()
    }
}

#[cfg(test)]
mod backend_round_trip_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_of_saved_snapshot_is_identical() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("urls.json"));

        let store = LinkStore::new();
        for i in 0..64 {
            store
                .insert(&format!("http://round-trip.com/{}", i), &format!("rt{}", i))
                .unwrap();
        }
        let snapshot = store.snapshot();

        backend.save(&snapshot).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_empty_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("urls.json"));

        backend.save(&LinkData::new()).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), LinkData::new());
    }

    #[tokio::test]
    async fn test_memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        let data = LinkData::from_entries([Entry {
            url: "http://example.com".into(),
            code: "e".into(),
        }]);

        backend.save(&data).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), data);
    }
}

#[cfg(test)]
mod startup_tests {
    use super::*;

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);
        fs::write(&config.data_file, "this is not json").unwrap();

        let backend = JsonFileBackend::new(&config.data_file);
        assert!(load_or_empty(&backend).await.is_empty());

        let svc = ShortenerService::open(&config).await.unwrap();
        assert_eq!(svc.stats().entries, 0);
        let code = svc.shorten("http://example.com").unwrap();
        svc.shutdown().await.unwrap();

        let reloaded = backend.load().await.unwrap();
        assert_eq!(reloaded.url_to_code["http://example.com"], code);
    }

    #[tokio::test]
    async fn test_existing_data_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);
        fs::write(
            &config.data_file,
            r#"{
 "url_to_string": {
  "http://www.google.com": "Qx"
 },
 "string_to_url": {
  "Qx": "http://www.google.com"
 }
}"#,
        )
        .unwrap();

        let svc = ShortenerService::open(&config).await.unwrap();
        assert_eq!(svc.resolve("Qx").unwrap(), "http://www.google.com");
        assert_eq!(svc.shorten("http://www.google.com").unwrap(), "Qx");
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        let svc = ShortenerService::open(&config).await.unwrap();
        let codes: Vec<_> = (0..20)
            .map(|i| {
                let url = format!("http://restart.com/{}", i);
                (url.clone(), svc.shorten(&url).unwrap())
            })
            .collect();
        svc.shutdown().await.unwrap();

        let reopened = ShortenerService::open(&config).await.unwrap();
        assert_eq!(reopened.stats().entries, 20);
        for (url, code) in &codes {
            assert_eq!(&reopened.resolve(code).unwrap(), url);
            assert_eq!(&reopened.shorten(url).unwrap(), code);
        }
        reopened.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_writes_indented_file() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        let svc = ShortenerService::open(&config).await.unwrap();
        let code = svc.shorten("http://example.com").unwrap();
        svc.flush().await.unwrap();

        let content = fs::read_to_string(&config.data_file).unwrap();
        assert!(content.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["url_to_string"]["http://example.com"], code.as_str());
        assert_eq!(parsed["string_to_url"][code.as_str()], "http://example.com");
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_backend_starts_from_seeded_state() {
        let data = LinkData::from_entries([Entry {
            url: "http://seeded.com".into(),
            code: "s".into(),
        }]);
        let backend = Arc::new(MemoryBackend::with_data(data));
        let store = Arc::new(LinkStore::from_data(load_or_empty(backend.as_ref()).await));

        assert_eq!(store.lookup_by_code("s").as_deref(), Some("http://seeded.com"));
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_config() {
        let config = StoreConfig {
            min_code_length: 3,
            max_code_length: 2,
            ..Default::default()
        };
        assert!(ShortenerService::open(&config).await.is_err());

        let config = StoreConfig {
            backend: "redis".into(),
            ..Default::default()
        };
        assert!(ShortenerService::open(&config).await.is_err());
    }
}
