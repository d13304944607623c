//! # Batch Runner Module
//!
//! Orchestratore principale della pipeline di compressione.
//!
//! ## Responsabilità:
//! - Drena la coda in ordine di inserimento, un file alla volta
//! - Per ogni file: risolve il path di output → invoca la compressione →
//!   interpreta l'esito → aggiorna storico o raccoglie warning/errori
//! - Svuota la coda a fine batch e torna `Idle`, a prescindere da quanti
//!   file singoli sono falliti
//!
//! ## Macchina a stati:
//! ```text
//! Idle → Running → (Idle | Failed)
//! ```
//! `Running` si entra solo con coda non vuota. `Failed` si raggiunge solo
//! quando la batch non può partire (Ultra richiesto senza Ghostscript e
//! fallback rifiutato). Gli errori per-file non sono mai fatali.
//!
//! ## Modello di concorrenza:
//! un solo worker logico, nessuna invocazione concorrente sullo stesso
//! batch: la latenza è dominata dal processo esterno. Nessun timeout e
//! nessuna cancellazione: un tool appeso blocca la batch (debolezza
//! accettata, non una feature).

use crate::{
    config::{CompressionTier, Config},
    error::CompressError,
    events::BatchEvent,
    file_manager::FileManager,
    history::{History, ProcessedRecord},
    invoker::CompressionInvoker,
    outcome::CompressionOutcome,
    paths::OutputPathResolver,
    platform::PlatformCommands,
    progress::ProgressManager,
    queue::ProcessingQueue,
};
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info, warn};

/// Explicit session state: the queue and the result history, owned by the
/// caller (a UI shell or the CLI), never by ambient globals.
#[derive(Debug, Default)]
pub struct Session {
    pub queue: ProcessingQueue,
    pub history: History,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Runner lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Failed,
}

/// Aggregated outcome of one batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files_processed: usize,
    pub files_succeeded: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub duration_seconds: f64,
}

impl BatchReport {
    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Compressed: {} | Warnings: {} | Errors: {}",
            self.files_processed,
            self.files_succeeded,
            self.warnings.len(),
            self.errors.len(),
        )
    }
}

/// Sequential batch orchestrator over an injectable invoker
pub struct BatchRunner<I: CompressionInvoker> {
    config: Config,
    invoker: I,
    /// Ghostscript probe result captured at construction; the script guards
    /// the remaining race on its own
    ultra_tool_present: bool,
    state: RunnerState,
}

impl<I: CompressionInvoker> BatchRunner<I> {
    pub fn new(config: Config, invoker: I, ultra_tool_present: bool) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            invoker,
            ultra_tool_present,
            state: RunnerState::Idle,
        })
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Tier that will actually be requested for this batch, after the
    /// Ultra → Advanced degradation policy
    fn effective_tier(&self) -> Result<(CompressionTier, Option<String>)> {
        if self.config.tier != CompressionTier::Ultra || self.ultra_tool_present {
            return Ok((self.config.tier, None));
        }

        if self.config.allow_tier_fallback {
            let message =
                "Ghostscript not found; using the advanced tier instead of ultra"
                    .to_string();
            warn!("{}", message);
            Ok((CompressionTier::Advanced, Some(message)))
        } else {
            Err(CompressError::MissingDependency(
                "Ghostscript is required for the ultra tier".to_string(),
            )
            .into())
        }
    }

    /// Run one batch over the full current queue. Drains the queue, appends
    /// successes to the session history, and collects per-file warnings and
    /// errors in the report. Processing always proceeds to completion.
    pub async fn run(&mut self, session: &mut Session) -> Result<BatchReport> {
        if session.queue.is_empty() {
            return Err(
                CompressError::Validation("the processing queue is empty".to_string())
                    .into(),
            );
        }

        let (tier, degradation) = match self.effective_tier() {
            Ok(t) => t,
            Err(e) => {
                self.state = RunnerState::Failed;
                return Err(e);
            }
        };

        self.state = RunnerState::Running;
        session.queue.reset_cursor();
        let start_time = std::time::Instant::now();

        let mut report = BatchReport::default();
        let entries = session.queue.entries().to_vec();
        let total = entries.len();

        let progress = if self.config.json_output {
            BatchEvent::Start {
                total_files: total,
                tier,
                save_location: self.config.save_location,
            }
            .emit();
            ProgressManager::hidden()
        } else {
            info!("Starting batch: {} file(s), tier {}", total, tier);
            ProgressManager::new(total as u64)
        };

        // Stream order contract: the start event always comes first, so the
        // degradation warning is emitted only once the stream is open.
        if let Some(message) = degradation {
            if self.config.json_output {
                BatchEvent::Warning {
                    path: None,
                    message: message.clone(),
                }
                .emit();
            }
            report.warnings.push(message);
        }

        for (index, input) in entries.iter().enumerate() {
            if self.config.json_output {
                BatchEvent::FileStart {
                    path: input.clone(),
                    index,
                    total,
                }
                .emit();
            }

            self.process_one(input, tier, session, &mut report);

            session.queue.advance_cursor();
            progress.update(&format!(
                "{}",
                input.file_name().unwrap_or_default().to_string_lossy()
            ));
        }

        report.files_processed = total;
        report.duration_seconds = start_time.elapsed().as_secs_f64();

        // The batch always runs to completion; the queue is cleared even
        // when individual files failed.
        session.queue.clear();
        self.state = RunnerState::Idle;

        progress.finish(&report.format_summary());
        if self.config.json_output {
            BatchEvent::Complete {
                files_processed: report.files_processed,
                files_succeeded: report.files_succeeded,
                warnings: report.warnings.len(),
                errors: report.errors.len(),
                duration_seconds: report.duration_seconds,
            }
            .emit();
        }

        Ok(report)
    }

    /// Resolve, invoke and classify a single queued file
    fn process_one(
        &self,
        input: &Path,
        tier: CompressionTier,
        session: &mut Session,
        report: &mut BatchReport,
    ) {
        let output = match OutputPathResolver::resolve(input, self.config.save_location)
        {
            Ok(path) => path,
            Err(e) => {
                let message = format!("{}: {}", input.display(), e);
                self.surface_error(input, &message, report);
                return;
            }
        };

        let raw = self.invoker.invoke(input, &output, tier);
        debug!("Raw status for {}: {:?}", input.display(), raw);

        match CompressionOutcome::parse(&raw) {
            CompressionOutcome::Success {
                original_bytes,
                compressed_bytes,
                reduction_percent,
                tier: tier_used,
            } => {
                let record = ProcessedRecord::new(
                    input.to_path_buf(),
                    output,
                    original_bytes,
                    compressed_bytes,
                    reduction_percent,
                    tier_used,
                );

                info!(
                    "Compressed {}: {} -> {} ({:.1}% saved, tier {})",
                    input.display(),
                    FileManager::format_size(original_bytes),
                    FileManager::format_size(compressed_bytes),
                    reduction_percent,
                    tier_used,
                );

                if self.config.json_output {
                    BatchEvent::file_complete(&record).emit();
                }
                if self.config.open_after {
                    self.open_file(&record.output_path);
                }

                session.history.push(record);
                report.files_succeeded += 1;
            }
            CompressionOutcome::Ineffective { reason, .. } => {
                let message =
                    format!("Compression not effective for {}: {}", input.display(), reason);
                warn!("{}", message);
                if self.config.json_output {
                    BatchEvent::Warning {
                        path: Some(input.to_path_buf()),
                        message: message.clone(),
                    }
                    .emit();
                }
                report.warnings.push(message);
            }
            CompressionOutcome::Failure { message } => {
                // Per-file invocation failures are collected, never fatal
                let error = CompressError::Invocation(format!(
                    "{}: {}",
                    input.display(),
                    message
                ));
                self.surface_error(input, &error.to_string(), report);
            }
        }
    }

    fn surface_error(&self, input: &Path, message: &str, report: &mut BatchReport) {
        warn!("Compression failed for {}", message);
        if self.config.json_output {
            BatchEvent::Error {
                path: input.to_path_buf(),
                message: message.to_string(),
            }
            .emit();
        }
        report.errors.push(message.to_string());
    }

    /// Best-effort "open file" side effect; never fails the batch
    fn open_file(&self, path: &Path) {
        let opener = PlatformCommands::instance().opener();
        let mut cmd = std::process::Command::new(opener[0]);
        cmd.args(&opener[1..]).arg(path);

        if let Err(e) = cmd.spawn() {
            warn!("Could not open {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaveLocation;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Canned-response invoker keyed by file stem
    struct FakeInvoker {
        responses: HashMap<String, String>,
        seen_tiers: Mutex<Vec<CompressionTier>>,
    }

    impl FakeInvoker {
        fn new(responses: &[(&str, &str)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                seen_tiers: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompressionInvoker for FakeInvoker {
        fn invoke(&self, input: &Path, _output: &Path, tier: CompressionTier) -> String {
            self.seen_tiers.lock().unwrap().push(tier);
            let stem = input
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            self.responses
                .get(&stem)
                .cloned()
                .unwrap_or_else(|| "EXITO:1000:400:60.00:medio".to_string())
        }
    }

    fn config() -> Config {
        Config {
            save_location: SaveLocation::SameFolder,
            ..Default::default()
        }
    }

    fn session_with_files(dir: &TempDir, names: &[&str]) -> Session {
        let mut session = Session::new();
        for name in names {
            let path = dir.path().join(name);
            std::fs::write(&path, b"%PDF-1.4").unwrap();
            session.queue.add(path);
        }
        session
    }

    #[tokio::test]
    async fn test_batch_drains_queue_and_fills_history() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf", "b.pdf"]);
        let mut runner =
            BatchRunner::new(config(), FakeInvoker::new(&[]), true).unwrap();

        let report = runner.run(&mut session).await.unwrap();

        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_succeeded, 2);
        assert!(report.errors.is_empty());
        assert!(session.queue.is_empty());
        assert_eq!(session.queue.cursor(), 0);
        assert_eq!(session.history.len(), 2);
        assert_eq!(runner.state(), RunnerState::Idle);
        // Most recent first
        assert_eq!(
            session.history.records()[0].original_path,
            dir.path().join("b.pdf")
        );
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf", "b.pdf", "c.pdf"]);
        let invoker = FakeInvoker::new(&[("b", "ERROR:broken xref table")]);
        let mut runner = BatchRunner::new(config(), invoker, true).unwrap();

        let report = runner.run(&mut session).await.unwrap();

        assert_eq!(report.files_processed, 3);
        assert_eq!(report.files_succeeded, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("broken xref table"));
        // Failures are surfaced through the invocation error type
        assert!(report.errors[0].contains("Invocation error"));
        assert_eq!(session.history.len(), 2);
        assert!(session.queue.is_empty());
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[tokio::test]
    async fn test_ineffective_compression_is_a_warning_without_history() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf"]);
        let invoker =
            FakeInvoker::new(&[("a", "ADVERTENCIA:1000:1000:0:bajo:no reduction")]);
        let mut runner = BatchRunner::new(config(), invoker, true).unwrap();

        let report = runner.run(&mut session).await.unwrap();

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.files_succeeded, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(session.history.is_empty());
        assert!(session.queue.is_empty());
    }

    #[tokio::test]
    async fn test_empty_queue_is_a_precondition_error() {
        let mut session = Session::new();
        let mut runner =
            BatchRunner::new(config(), FakeInvoker::new(&[]), true).unwrap();

        assert!(runner.run(&mut session).await.is_err());
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[tokio::test]
    async fn test_ultra_degrades_to_advanced_with_warning() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf"]);
        let mut cfg = config();
        cfg.tier = CompressionTier::Ultra;
        let mut runner = BatchRunner::new(cfg, FakeInvoker::new(&[]), false).unwrap();

        let report = runner.run(&mut session).await.unwrap();

        assert_eq!(report.files_succeeded, 1);
        assert!(report.warnings.iter().any(|w| w.contains("Ghostscript")));
        assert_eq!(
            runner.invoker.seen_tiers.lock().unwrap().as_slice(),
            &[CompressionTier::Advanced]
        );
    }

    #[tokio::test]
    async fn test_degradation_warning_survives_event_mode() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf"]);
        let mut cfg = config();
        cfg.tier = CompressionTier::Ultra;
        cfg.json_output = true;
        let mut runner = BatchRunner::new(cfg, FakeInvoker::new(&[]), false).unwrap();

        let report = runner.run(&mut session).await.unwrap();

        // The warning is recorded after the batch is started, so it belongs
        // to the report of the run it applies to.
        assert_eq!(report.files_succeeded, 1);
        assert!(report.warnings.iter().any(|w| w.contains("Ghostscript")));
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[tokio::test]
    async fn test_ultra_without_fallback_refuses_to_start() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf"]);
        let mut cfg = config();
        cfg.tier = CompressionTier::Ultra;
        cfg.allow_tier_fallback = false;
        let mut runner = BatchRunner::new(cfg, FakeInvoker::new(&[]), false).unwrap();

        assert!(runner.run(&mut session).await.is_err());
        assert_eq!(runner.state(), RunnerState::Failed);
        // Nothing was processed, the queue is untouched
        assert_eq!(session.queue.count(), 1);
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn test_ultra_passes_through_when_tool_present() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with_files(&dir, &["a.pdf"]);
        let mut cfg = config();
        cfg.tier = CompressionTier::Ultra;
        let mut runner = BatchRunner::new(cfg, FakeInvoker::new(&[]), true).unwrap();

        runner.run(&mut session).await.unwrap();

        assert_eq!(
            runner.invoker.seen_tiers.lock().unwrap().as_slice(),
            &[CompressionTier::Ultra]
        );
    }
}
