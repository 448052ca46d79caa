//! In-memory history, used by tests and ephemeral deployments

use super::types::{remove_indices, HistoryEntry, HistoryError, HistoryResult};
use super::HistoryStore;

#[derive(Debug, Default, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        self.entries.push(entry);
        Ok(())
    }

    fn list(&self) -> HistoryResult<Vec<HistoryEntry>> {
        Ok(self.entries.clone())
    }

    fn delete(&mut self, index: usize) -> HistoryResult<HistoryEntry> {
        if index >= self.entries.len() {
            return Err(HistoryError::OutOfRange { index, len: self.entries.len() });
        }
        Ok(self.entries.remove(index))
    }

    fn delete_many(&mut self, indices: &[usize]) -> HistoryResult<Vec<HistoryEntry>> {
        remove_indices(&mut self.entries, indices)
    }

    fn len(&self) -> HistoryResult<usize> {
        Ok(self.entries.len())
    }
}
