//! # PDF Squeeze Library
//!
//! Questo è il modulo principale della libreria che espone le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per una UI esterna
//!
//! ## Architettura dei moduli:
//! - `config`: configurazione, tier di compressione, policy di salvataggio
//! - `error`: tipi di errore custom
//! - `queue`: coda ordinata dei file in attesa con cursore di avanzamento
//! - `paths`: risoluzione dei path di output senza collisioni
//! - `invoker`: invocazione del comando esterno di compressione
//! - `outcome`: parsing della riga di stato del tool esterno
//! - `runner`: orchestratore sequenziale della batch
//! - `history`: storico in memoria delle compressioni riuscite
//! - `probes`: controlli di presenza delle dipendenze esterne
//! - `platform`: nomi comando cross-platform
//! - `file_manager`: discovery PDF e utilità sui file
//! - `events`: eventi JSON per una UI esterna
//! - `progress`: progress bar per la CLI
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use pdf_squeeze::{BatchRunner, Config, ScriptInvoker, Session};
//!
//! let mut session = Session::new();
//! session.queue.add("report.pdf".into());
//!
//! let invoker = ScriptInvoker::new()?;
//! let mut runner = BatchRunner::new(Config::default(), invoker, false)?;
//! let report = runner.run(&mut session).await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod file_manager;
pub mod history;
pub mod invoker;
pub mod outcome;
pub mod paths;
pub mod platform;
pub mod probes;
pub mod progress;
pub mod queue;
pub mod runner;

pub use config::{CompressionTier, Config, SaveLocation};
pub use error::CompressError;
pub use history::{History, ProcessedRecord};
pub use invoker::{CompressionInvoker, ScriptInvoker};
pub use outcome::CompressionOutcome;
pub use paths::OutputPathResolver;
pub use probes::DependencyReport;
pub use queue::ProcessingQueue;
pub use runner::{BatchReport, BatchRunner, RunnerState, Session};
