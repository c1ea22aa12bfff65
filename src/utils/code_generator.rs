//! Short code synthesis
//!
//! Codes are drawn from a 52-letter alphabet with an expanding-length search:
//! every length in the policy range gets a fixed number of random probes
//! before the generator moves on to the next length. Short codes are handed
//! out while the space is sparse and grow only as collisions pile up.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::errors::{LinkmapError, Result};

/// Letters only, no digits or symbols.
pub const CODE_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Returns true if `code` could have been produced by a [`CodeGenerator`].
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Search bounds for [`CodeGenerator::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub attempts_per_length: usize,
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 9,
            attempts_per_length: 10,
        }
    }
}

impl GeneratorPolicy {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            min_length: config.min_code_length,
            max_length: config.max_code_length,
            attempts_per_length: config.attempts_per_length,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(LinkmapError::config(format!(
                "invalid code length range {}..={}",
                self.min_length, self.max_length
            )));
        }
        if self.attempts_per_length == 0 {
            return Err(LinkmapError::config("attempts_per_length must be >= 1"));
        }
        Ok(())
    }

    /// Upper bound on the number of candidates a single `next` call draws.
    pub fn max_attempts(&self) -> usize {
        (self.max_length - self.min_length + 1) * self.attempts_per_length
    }
}

/// Randomized short code generator.
///
/// The randomness source is injectable; the default is a `StdRng` seeded
/// once from the OS-seeded thread RNG, so separate processes and separate
/// generators never replay the same sequence.
pub struct CodeGenerator<R = StdRng> {
    policy: GeneratorPolicy,
    rng: Mutex<R>,
}

impl CodeGenerator<StdRng> {
    pub fn new(policy: GeneratorPolicy) -> Result<Self> {
        Self::with_rng(policy, StdRng::seed_from_u64(rand::random()))
    }

    /// Deterministic generator, for tests and reproducible runs.
    pub fn with_seed(policy: GeneratorPolicy, seed: u64) -> Result<Self> {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CodeGenerator<R> {
    pub fn with_rng(policy: GeneratorPolicy, rng: R) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            rng: Mutex::new(rng),
        })
    }

    pub fn policy(&self) -> &GeneratorPolicy {
        &self.policy
    }

    /// Draw one candidate of exactly `length` characters.
    pub fn random_code(&self, length: usize) -> String {
        let mut rng = self.rng.lock();
        Self::draw(&mut *rng, length)
    }

    /// Produce a code for which `exists` returns false.
    ///
    /// `exists` is consulted once per candidate; the caller must keep the
    /// answer stable until the returned code is inserted.
    pub fn next<F>(&self, exists: F) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut rng = self.rng.lock();

        for length in self.policy.min_length..=self.policy.max_length {
            for _ in 0..self.policy.attempts_per_length {
                let candidate = Self::draw(&mut *rng, length);
                if !exists(&candidate) {
                    return Ok(candidate);
                }
            }
            debug!(
                "CodeGenerator: {} collisions at length {}, growing",
                self.policy.attempts_per_length, length
            );
        }

        warn!(
            "CodeGenerator: exhausted {} attempts across lengths {}..={}",
            self.policy.max_attempts(),
            self.policy.min_length,
            self.policy.max_length
        );
        Err(LinkmapError::generation_exhausted(format!(
            "no free code found with length {}..={}",
            self.policy.min_length, self.policy.max_length
        )))
    }

    fn draw(rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}
