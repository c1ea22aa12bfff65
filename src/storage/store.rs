//! In-memory bidirectional link store
//!
//! Two maps kept in lockstep behind one reader/writer lock. Lookups and
//! snapshots share the lock; inserts take it exclusively, so a reader never
//! observes one direction updated without the other.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::models::LinkData;
use crate::errors::{LinkmapError, Result};

#[derive(Debug, Default)]
struct Mappings {
    /// url -> code
    code_of: HashMap<String, String>,
    /// code -> url
    value_of: HashMap<String, String>,
}

impl Mappings {
    /// Insert a pair only when neither side is present.
    fn insert(&mut self, url: String, code: String) -> Result<()> {
        if let Some(existing) = self.code_of.get(&url) {
            return Err(LinkmapError::conflict(format!(
                "url '{}' is already mapped to '{}'",
                url, existing
            )));
        }
        if let Some(existing) = self.value_of.get(&code) {
            return Err(LinkmapError::conflict(format!(
                "code '{}' is already mapped to '{}'",
                code, existing
            )));
        }

        self.value_of.insert(code.clone(), url.clone());
        self.code_of.insert(url, code);
        Ok(())
    }
}

pub struct LinkStore {
    inner: RwLock<Mappings>,
}

impl Default for LinkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Mappings::default()),
        }
    }

    /// Build a store from persisted state.
    ///
    /// The forward map is authoritative. A pair whose reverse entry names a
    /// different url is dropped, as is any pair that would map a code or url
    /// twice. Reverse-only pairs are recovered when they do not conflict.
    pub fn from_data(data: LinkData) -> Self {
        let LinkData {
            url_to_code,
            mut code_to_url,
        } = data;
        let mut maps = Mappings::default();
        let mut dropped = 0usize;

        for (url, code) in url_to_code {
            match code_to_url.remove(&code) {
                Some(reverse) if reverse != url => {
                    warn!(
                        "Dropping '{}' -> '{}': reverse map points '{}' at '{}'",
                        url, code, code, reverse
                    );
                    dropped += 1;
                    continue;
                }
                Some(_) => {}
                None => debug!("Reverse entry missing for code '{}', rebuilding", code),
            }

            if let Err(e) = maps.insert(url, code) {
                warn!("Dropping persisted entry: {}", e);
                dropped += 1;
            }
        }

        for (code, url) in code_to_url {
            if maps.code_of.contains_key(&url) {
                continue;
            }
            if let Err(e) = maps.insert(url, code) {
                warn!("Dropping reverse-only entry: {}", e);
                dropped += 1;
            }
        }

        if dropped > 0 {
            warn!("Discarded {} inconsistent entries while loading", dropped);
        }
        info!("LinkStore initialized with {} entries", maps.code_of.len());

        Self {
            inner: RwLock::new(maps),
        }
    }

    pub fn lookup_by_value(&self, url: &str) -> Option<String> {
        self.inner.read().code_of.get(url).cloned()
    }

    pub fn lookup_by_code(&self, code: &str) -> Option<String> {
        self.inner.read().value_of.get(code).cloned()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.inner.read().value_of.contains_key(code)
    }

    /// Insert a new pair. Fails without touching either map when `url` or
    /// `code` is already present.
    pub fn insert(&self, url: &str, code: &str) -> Result<()> {
        self.inner.write().insert(url.to_string(), code.to_string())
    }

    /// Return the code for `url`, creating one with `generate` if missing.
    ///
    /// The re-check, the generator's existence probes and the insert all run
    /// under a single write guard, so concurrent callers can neither assign
    /// the same code twice nor map the same url twice. The boolean is true
    /// when a new entry was created.
    pub fn get_or_insert_with<F>(&self, url: &str, generate: F) -> Result<(String, bool)>
    where
        F: FnOnce(&dyn Fn(&str) -> bool) -> Result<String>,
    {
        let mut guard = self.inner.write();
        let maps = &mut *guard;

        if let Some(code) = maps.code_of.get(url) {
            return Ok((code.clone(), false));
        }

        let exists = |candidate: &str| maps.value_of.contains_key(candidate);
        let code = generate(&exists)?;

        maps.insert(url.to_string(), code.clone())?;
        Ok((code, true))
    }

    /// Consistent copy of both mappings.
    pub fn snapshot(&self) -> LinkData {
        let guard = self.inner.read();
        LinkData {
            url_to_code: guard
                .code_of
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            code_to_url: guard
                .value_of
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().code_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
