//! JSON Lines history file
//!
//! One entry per line, insertion order. Every operation opens the file in
//! its own scope; the handle is flushed, synced and dropped before returning.
//!
//! ## Crash behaviour
//! - append writes a whole line in append mode
//! - delete writes a sibling `.tmp` file and renames it over the original
//! - a malformed final line (interrupted append) is skipped on read and
//!   trimmed before the next append; a malformed line elsewhere is
//!   [`HistoryError::Corrupt`]

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::types::{remove_indices, HistoryEntry, HistoryError, HistoryResult};
use super::HistoryStore;

#[derive(Debug, Clone)]
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    /// History at `path`. Nothing touches the disk until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> HistoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn read_all(&self) -> HistoryResult<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        let last = lines.iter().rposition(|l| !l.trim().is_empty());

        let mut entries = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) if Some(i) == last => {
                    log::warn!("Skipping torn last line {} of {}: {}", i + 1, self.path.display(), e);
                }
                Err(source) => return Err(HistoryError::Corrupt { line: i + 1, source }),
            }
        }
        Ok(entries)
    }

    /// Replace the file contents atomically
    fn rewrite(&self, entries: &[HistoryEntry]) -> HistoryResult<()> {
        self.ensure_parent()?;
        let temp = self.temp_path();

        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            for entry in entries {
                serde_json::to_writer(&mut writer, entry)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Drop a partial trailing line left by an interrupted append
fn repair_tail(file: &mut File, path: &Path) -> HistoryResult<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(());
    }

    let mut content = Vec::with_capacity(len as usize);
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut content)?;

    let keep = content.iter().rposition(|b| *b == b'\n').map_or(0, |p| p + 1);
    if serde_json::from_slice::<HistoryEntry>(&content[keep..]).is_ok() {
        // Complete entry, only the newline is missing
        file.write_all(b"\n")?;
    } else {
        log::warn!("Trimming torn last line of {}", path.display());
        file.set_len(keep as u64)?;
    }
    Ok(())
}

impl HistoryStore for JsonlHistory {
    fn append(&mut self, entry: HistoryEntry) -> HistoryResult<()> {
        self.ensure_parent()?;

        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new().create(true).read(true).append(true).open(&self.path)?;
        repair_tail(&mut file, &self.path)?;
        file.write_all(&line)?;
        file.flush()?;
        file.sync_all()?;

        log::debug!("History entry {} appended", entry.id);
        Ok(())
    }

    fn list(&self) -> HistoryResult<Vec<HistoryEntry>> {
        self.read_all()
    }

    fn delete(&mut self, index: usize) -> HistoryResult<HistoryEntry> {
        let mut entries = self.read_all()?;
        if index >= entries.len() {
            return Err(HistoryError::OutOfRange { index, len: entries.len() });
        }

        let removed = entries.remove(index);
        self.rewrite(&entries)?;

        log::info!("History entry {} deleted (index {})", removed.id, index);
        Ok(removed)
    }

    fn delete_many(&mut self, indices: &[usize]) -> HistoryResult<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        let removed = remove_indices(&mut entries, indices)?;
        if !removed.is_empty() {
            self.rewrite(&entries)?;
            log::info!("{} history entries deleted", removed.len());
        }
        Ok(removed)
    }

    fn len(&self) -> HistoryResult<usize> {
        Ok(self.read_all()?.len())
    }
}
