use crate::Generator;
use pinhole_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic short code generator using a sequential counter.
///
/// This generator produces codes like "wh000000", "wh000001", etc. They
/// don't have the shape of random codes, which makes them easy to spot in
/// a log. A cycle length can be set so the counter wraps around, forcing
/// the collisions a random generator only produces by chance.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
    cycle: Option<u64>,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
            cycle: self.cycle,
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a new sequential generator starting from a specific counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
            cycle: None,
        }
    }

    /// Wraps the counter after `len` codes, so code `n` repeats at `n + len`.
    /// A zero length is treated as one.
    pub fn cycling(mut self, len: u64) -> Self {
        self.cycle = Some(len.max(1));
        self
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> ShortCode {
        let mut count = self.counter.fetch_add(1, Ordering::SeqCst);
        if let Some(cycle) = self.cycle {
            count %= cycle;
        }
        ShortCode::new(format!("{}{:06}", self.prefix, count))
    }
}
