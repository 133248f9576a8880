//! Block identifiers and the per-session identity generator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default prefix for generated block ids.
pub const DEFAULT_ID_PREFIX: &str = "blk";

/// Identifier shared by containers and fields.
///
/// Containers and fields live in one id space, so a `BlockId` never needs a
/// kind tag to be unambiguous inside a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw identifier.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for BlockId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deterministic id source for one editing session.
///
/// Ids have the form `{prefix}-{n}` with `n` starting at 1. The counter never
/// repeats within a session; uniqueness against ids loaded from a persisted
/// document is enforced by the store, which skips any id already in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl IdGenerator {
    /// Create a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Prefix applied to every generated id.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next - 1
    }

    /// Produce the next id and advance the counter.
    pub fn next_id(&mut self) -> BlockId {
        let n = self.next;
        self.next = self.next.wrapping_add(1).max(1);
        BlockId(format!("{}-{n}", self.prefix))
    }

    /// Produce the next id for which `taken` returns false.
    pub fn next_id_where(&mut self, mut taken: impl FnMut(&BlockId) -> bool) -> BlockId {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}
