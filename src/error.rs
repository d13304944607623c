//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom dell'applicazione.
//!
//! ## Categorie di errori:
//! - `Io`: errori di I/O (file non trovati, permessi, etc.)
//! - `MissingDependency`: tool esterno mancante (python3, PyPDF2, gs)
//! - `Invocation`: il processo esterno non è partito o non è gestibile
//! - `Validation`: errori di validazione input (path non valido, coda vuota)
//!
//! Gli esiti per-file (compressione non efficace, riga ERROR dello script)
//! NON sono errori Rust: vengono modellati come varianti di
//! `CompressionOutcome` e raccolti nel `BatchReport`, perché il fallimento
//! di un singolo file non interrompe la batch.

/// Custom error types for the compression pipeline
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Invocation error: {0}")]
    Invocation(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
