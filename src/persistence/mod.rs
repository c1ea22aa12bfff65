//! Durable storage of the link store
//!
//! - `backends`: where the persisted record lives (JSON file, memory)
//! - `writer`: background task that turns save triggers into writes

pub mod backends;
pub mod writer;

pub use backends::{
    JsonFileBackend, MemoryBackend, PersistenceBackend, create_backend, load_or_empty,
};
pub use writer::{PersistenceStats, PersistenceWriter};
