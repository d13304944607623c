//! # Processing Queue Module
//!
//! Questo modulo gestisce la coda dei PDF in attesa di compressione.
//!
//! ## Responsabilità:
//! - Mantiene la sequenza ordinata dei file (ordine di inserimento =
//!   ordine di elaborazione)
//! - Deduplica gli inserimenti per path normalizzato
//! - Traccia un cursore di avanzamento durante una batch
//!
//! ## Invarianti:
//! - cursore ∈ [0, len]
//! - `clear()` svuota la sequenza e riporta il cursore a 0
//! - nessuna entry duplicata per lo stesso path normalizzato

use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered queue of pending input files with a batch progress cursor
#[derive(Debug, Default)]
pub struct ProcessingQueue {
    entries: Vec<PathBuf>,
    cursor: usize,
}

impl ProcessingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a path for deduplication. Canonicalization only works for
    /// existing files, so fall back to the path as given.
    fn normalize(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Append a file to the queue. No-op when an entry with the same
    /// normalized path is already queued.
    pub fn add(&mut self, path: PathBuf) {
        let normalized = Self::normalize(&path);
        if self
            .entries
            .iter()
            .any(|existing| Self::normalize(existing) == normalized)
        {
            debug!("Skipping duplicate queue entry: {}", path.display());
            return;
        }
        self.entries.push(path);
    }

    /// Empty the queue and reset the cursor to 0
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Reset the cursor without touching the entries (start of a new batch)
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Advance the cursor by one, never past the queue length
    pub fn advance_cursor(&mut self) {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Snapshot of the queued paths in processing order
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}
