//! Test id generator.

use std::sync::atomic::{AtomicI64, Ordering};

use pricing_core::ids::IdGenerator;

/// Hands out consecutive identifiers starting at a chosen value.
#[derive(Debug)]
pub struct SequenceIds {
    next: AtomicI64,
}

impl SequenceIds {
    /// Create a generator whose first id is `first`.
    #[must_use]
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}
