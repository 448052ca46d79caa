//! History Module - persisted prediction log
//!
//! # Architecture
//! - `types.rs`: `HistoryEntry`, `HistoryError`
//! - `memory.rs`: `Vec`-backed store
//! - `jsonl.rs`: JSON Lines file store
//!
//! Indices are positions in insertion order, as returned by `list()`.

pub mod jsonl;
pub mod memory;
pub mod types;

pub use jsonl::JsonlHistory;
pub use memory::MemoryHistory;
pub use types::{HistoryEntry, HistoryError, HistoryResult};

/// Append-only log with positional delete
pub trait HistoryStore: Send {
    /// Add an entry at the end
    fn append(&mut self, entry: HistoryEntry) -> HistoryResult<()>;

    /// All entries, oldest first
    fn list(&self) -> HistoryResult<Vec<HistoryEntry>>;

    /// Remove the entry at `index`. Out of range leaves the store untouched.
    fn delete(&mut self, index: usize) -> HistoryResult<HistoryEntry>;

    /// Remove several entries at once; every index is checked before anything is removed
    fn delete_many(&mut self, indices: &[usize]) -> HistoryResult<Vec<HistoryEntry>>;

    fn len(&self) -> HistoryResult<usize>;

    fn is_empty(&self) -> HistoryResult<bool> {
        Ok(self.len()? == 0)
    }
}
