//! Correlation id allocation for JSON-RPC requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Allocator of correlation ids for one MCP session.
///
/// Ids are decimal strings counting up from 1.  Clones share the counter,
/// so every request issued through any clone of a client gets a distinct
/// id.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: Arc<AtomicU64>,
}

impl IdSequence {
    /// Creates a sequence whose first id is `"1"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the next id.
    pub fn next_id(&self) -> String {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        id.to_string()
    }
}
