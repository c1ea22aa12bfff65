//! linkmap - a durable bidirectional URL <-> short code store
//!
//! The core maps long values (URLs) to short codes and back, keeping both
//! directions in lockstep, synthesizing collision-free codes and writing the
//! state to disk in the background.
//!
//! # Architecture
//! - `storage`: in-memory bijection behind a reader/writer lock
//! - `utils`: short code generation
//! - `persistence`: durable backends and the background writer
//! - `services`: `shorten` / `resolve` orchestration
//! - `config`: TOML + environment configuration
//! - `system`: logging setup
//! - `cli`: command-line front end (feature `cli`)
//!
//! # Example
//! ```no_run
//! use linkmap::config::StoreConfig;
//! use linkmap::services::ShortenerService;
//!
//! # async fn demo() -> linkmap::errors::Result<()> {
//! let service = ShortenerService::open(&StoreConfig::default()).await?;
//! let code = service.shorten("http://example.com")?;
//! assert_eq!(service.resolve(&code)?, "http://example.com");
//! service.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
