//! # JSON Event Stream Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per una UI esterna.
//!
//! ## Responsabilità:
//! - Emette messaggi JSON su stdout per gli eventi di una batch
//! - È l'unica superficie "user-facing" della libreria: una shell grafica
//!   osserva la sessione tramite questi eventi invece di stato globale
//!
//! ## Tipi di messaggi:
//! - `start`: inizio batch (numero file, tier, destinazione)
//! - `file_start`: inizio elaborazione di un file
//! - `file_complete`: compressione riuscita (record completo)
//! - `warning`: compressione non efficace o tier degradato
//! - `error`: errore per-file, la batch continua
//! - `complete`: fine batch con i conteggi finali

use crate::config::{CompressionTier, SaveLocation};
use crate::history::ProcessedRecord;
use serde::Serialize;
use std::path::PathBuf;

/// Structured batch event
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum BatchEvent {
    #[serde(rename = "start")]
    Start {
        total_files: usize,
        tier: CompressionTier,
        save_location: SaveLocation,
    },

    #[serde(rename = "file_start")]
    FileStart {
        path: PathBuf,
        index: usize,
        total: usize,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        output_path: PathBuf,
        original_bytes: u64,
        compressed_bytes: u64,
        reduction_percent: f64,
        tier: CompressionTier,
    },

    #[serde(rename = "warning")]
    Warning {
        path: Option<PathBuf>,
        message: String,
    },

    #[serde(rename = "error")]
    Error { path: PathBuf, message: String },

    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_succeeded: usize,
        warnings: usize,
        errors: usize,
        duration_seconds: f64,
    },
}

impl BatchEvent {
    /// Emit the event as one JSON line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn file_complete(record: &ProcessedRecord) -> Self {
        Self::FileComplete {
            path: record.original_path.clone(),
            output_path: record.output_path.clone(),
            original_bytes: record.original_bytes,
            compressed_bytes: record.compressed_bytes,
            reduction_percent: record.reduction_percent,
            tier: record.tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = BatchEvent::Start {
            total_files: 3,
            tier: CompressionTier::Advanced,
            save_location: SaveLocation::Desktop,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"start\""));
        assert!(json.contains("\"tier\":\"advanced\""));
        assert!(json.contains("\"save_location\":\"desktop\""));
    }

    #[test]
    fn test_file_complete_from_record() {
        let record = ProcessedRecord::new(
            PathBuf::from("/tmp/a.pdf"),
            PathBuf::from("/tmp/a_compressed.pdf"),
            1000,
            400,
            60.0,
            CompressionTier::Basic,
        );
        let json = serde_json::to_string(&BatchEvent::file_complete(&record)).unwrap();
        assert!(json.contains("\"type\":\"file_complete\""));
        assert!(json.contains("\"original_bytes\":1000"));
        assert!(json.contains("\"tier\":\"basic\""));
    }
}
