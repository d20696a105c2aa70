use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of unique opaque string tokens.
///
/// Tokens stand in for node identities on the wire, so a collision
/// would merge two unrelated nodes in the receiving service. Minters
/// are shared between concurrent profiling sessions and must stay
/// unique across all of them.
pub trait TokenMinter: Send + Sync {
    /// Return a token distinct from every token previously returned.
    fn next_token(&self) -> String;
}

/// Minter producing random v4 UUIDs.
///
/// Uniqueness holds across the whole process lifetime (and in practice
/// across processes), which makes this the default minter for real
/// submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidMinter;

impl UuidMinter {
    pub fn new() -> Self {
        Self
    }
}

impl TokenMinter for UuidMinter {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Minter producing `{prefix}{counter}` tokens from an atomic counter.
///
/// Deterministic and unique per instance; two instances with the same
/// prefix will collide, so reserve this for reproducible runs where
/// the caller controls every minter in the process.
#[derive(Debug)]
pub struct SequenceMinter {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceMinter {
    /// Create a minter producing "u1", "u2", ...
    pub fn new() -> Self {
        Self::with_prefix("u")
    }

    /// Create a minter with a custom token prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }
}

impl Default for SequenceMinter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMinter for SequenceMinter {
    fn next_token(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}
