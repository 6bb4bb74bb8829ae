//! Region identifiers
//!
//! Each region is written to Label Studio as two result entries that share
//! one identifier. Identifiers only need to be distinct within a task, so the
//! default generator keeps the first ten characters of a random UUID.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Default identifier length, in characters
pub const DEFAULT_ID_LENGTH: usize = 10;

/// Source of fresh region identifiers
pub trait IdGenerator: Send + Sync {
    /// Return an identifier not handed out before
    fn next_id(&self) -> String;
}

/// Random identifiers taken from a v4 UUID
#[derive(Debug, Clone)]
pub struct UuidIdGenerator {
    length: usize,
}

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self::with_length(DEFAULT_ID_LENGTH)
    }

    /// Keep `length` characters of the hyphenated UUID (at most 36)
    pub fn with_length(length: usize) -> Self {
        Self {
            length: length.clamp(1, 36),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for UuidIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        let mut id = Uuid::new_v4().hyphenated().to_string();
        id.truncate(self.length);
        id
    }
}

/// Deterministic identifiers (`prefix` followed by a counter)
///
/// Useful for reproducible output and tests.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("region-")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}
