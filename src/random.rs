//! Randomness port
//!
//! Secret selection and category shuffling go through [`RandomSource`] so that
//! tests can pin the sequence. Session identifiers do NOT use this port; see
//! [`new_session_id`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Uniform choice and shuffle operations used by the game logic
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&self, len: usize) -> usize;

    /// Uniform in-place shuffle
    fn shuffle(&self, items: &mut [usize]);
}

/// Process-wide pseudorandom source, seeded once at construction
pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    /// Seed from the operating system (once per process)
    pub fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic source for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic while holding the lock cannot leave StdRng in a broken state
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_os()
    }
}

impl RandomSource for StdRandom {
    fn index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.random_range(0..len))
    }

    fn shuffle(&self, items: &mut [usize]) {
        self.with_rng(|rng| items.shuffle(rng));
    }
}

/// Generate a session identifier: 16 bytes from the thread-local CSPRNG, hex encoded
pub fn new_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
