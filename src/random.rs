//! Injectable source of uniform random draws.
//!
//! Role assignment, page choice and movie choice all go through here so a
//! seeded source can make a whole session reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct RandomSource {
    rng: Arc<Mutex<StdRng>>,
}

impl RandomSource {
    /// Seeded from the operating system
    pub fn from_os() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Deterministic source for tests and reproducible sessions
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot draw from an empty range");
        if len <= 1 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }

    /// Uniform page number in `[1, max_page]`, treating 0 as 1
    pub fn page(&self, max_page: u32) -> u32 {
        let max_page = max_page.max(1);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(1..=max_page)
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.index(items.len()))
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_os()
    }
}
