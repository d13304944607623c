//! # Result History Module
//!
//! Questo modulo mantiene lo storico in memoria delle compressioni riuscite.
//!
//! ## Responsabilità:
//! - `ProcessedRecord`: entry immutabile con path originale, path di output,
//!   dimensioni, percentuale di riduzione, tier effettivo e timestamp
//! - `History`: lista most-recent-first, rimozione singola o totale
//!
//! Lo storico appartiene allo stato di sessione e non viene mai scritto su
//! disco: un riavvio riparte da zero.

use crate::config::CompressionTier;
use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;

/// History entry for one successful compression. Created only from a
/// `Success` outcome; never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedRecord {
    pub original_path: PathBuf,
    pub output_path: PathBuf,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub reduction_percent: f64,
    /// Tier actually used, which may differ from the requested one
    pub tier: CompressionTier,
    /// Unix timestamp of completion
    pub processed_at: u64,
}

impl ProcessedRecord {
    pub fn new(
        original_path: PathBuf,
        output_path: PathBuf,
        original_bytes: u64,
        compressed_bytes: u64,
        reduction_percent: f64,
        tier: CompressionTier,
    ) -> Self {
        let processed_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            original_path,
            output_path,
            original_bytes,
            compressed_bytes,
            reduction_percent,
            tier,
            processed_at,
        }
    }
}

/// In-memory, most-recent-first list of completed compressions
#[derive(Debug, Default)]
pub struct History {
    records: Vec<ProcessedRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record (most recent first)
    pub fn push(&mut self, record: ProcessedRecord) {
        self.records.insert(0, record);
    }

    /// Remove one entry by position; returns it when the index is valid
    pub fn remove(&mut self, index: usize) -> Option<ProcessedRecord> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, most recent first
    pub fn records(&self) -> &[ProcessedRecord] {
        &self.records
    }
}
