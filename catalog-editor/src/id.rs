//! Temporary identifiers for client-created variants and sizes
//!
//! Ids look like `tmp-variant-3f9a1c2e-7`: the reserved prefix, the entity
//! kind, a per-session nonce and a monotonic counter. The server never sees
//! them; they are stripped when the draft is cleaned for submission.

use shared::util::TEMP_ID_PREFIX;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Kind of entity a temporary id is issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TempIdKind {
    Variant,
    Size,
}

impl TempIdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variant => "variant",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for TempIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-scoped temporary id allocator
///
/// Distinct calls never return the same id. Shared between threads behind an
/// `Arc`; the counter is the only state.
#[derive(Debug)]
pub struct TempIdAllocator {
    nonce: String,
    counter: AtomicU64,
}

impl TempIdAllocator {
    /// Allocator with a random nonce
    pub fn new() -> Self {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        Self::with_nonce(&nonce[..8])
    }

    /// Allocator with a fixed nonce (deterministic ids in tests)
    pub fn with_nonce(nonce: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Issue the next id for `kind`
    pub fn next(&self, kind: TempIdKind) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}-{}-{}", TEMP_ID_PREFIX, kind, self.nonce, n)
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for TempIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::is_temp_id;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_are_tagged() {
        let ids = TempIdAllocator::with_nonce("abcd1234");
        let v = ids.next(TempIdKind::Variant);
        let s = ids.next(TempIdKind::Size);
        assert_eq!(v, "tmp-variant-abcd1234-1");
        assert_eq!(s, "tmp-size-abcd1234-2");
        assert!(is_temp_id(&v));
        assert!(is_temp_id(&s));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_random_nonce_differs_between_sessions() {
        let a = TempIdAllocator::new().next(TempIdKind::Size);
        let b = TempIdAllocator::new().next(TempIdKind::Size);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unique_across_threads() {
        let ids = Arc::new(TempIdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| ids.next(TempIdKind::Variant))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
