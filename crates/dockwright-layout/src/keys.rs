#![forbid(unsafe_code)]

//! Per-dock drag keys.
//!
//! Each dock stores its drag payload under a key unique to it, so a drop is
//! only accepted by the dock the drag came from. Keys come from an injected
//! [`DragKeyGenerator`] rather than a process-wide counter, which keeps tests
//! deterministic.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default prefix for generated keys.
pub const DRAG_KEY_DEFAULT_PREFIX: &str = "dock";

/// Key under which one dock's drag payload travels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DragKey(String);

impl DragKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DragKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DragKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hands out `"{prefix}-{n}"` keys with a monotonically increasing `n`.
///
/// Shareable across threads by reference.
#[derive(Debug)]
pub struct DragKeyGenerator {
    prefix: String,
    next: AtomicU64,
}

impl Default for DragKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DragKeyGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(DRAG_KEY_DEFAULT_PREFIX)
    }

    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next key.
    pub fn next_key(&self) -> DragKey {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        DragKey(format!("{}-{n}", self.prefix))
    }

    /// Number of keys handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[test]
    fn keys_are_sequential_per_generator() {
        let keys = DragKeyGenerator::new();
        assert_eq!(keys.next_key().as_str(), "dock-1");
        assert_eq!(keys.next_key().as_str(), "dock-2");
        assert_eq!(keys.issued(), 2);

        let other = DragKeyGenerator::with_prefix("side");
        assert_eq!(other.next_key().to_string(), "side-1");
    }

    #[test]
    fn shared_generator_never_repeats() {
        let keys = Arc::new(DragKeyGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let keys = Arc::clone(&keys);
                std::thread::spawn(move || (0..50).map(|_| keys.next_key()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = BTreeSet::new();
        for handle in handles {
            for key in handle.join().expect("worker thread") {
                assert!(seen.insert(key), "duplicate key");
            }
        }
        assert_eq!(seen.len(), 200);
    }
}
