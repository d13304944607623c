//! # PDF Squeeze - Main Entry Point
//!
//! Punto di ingresso della command line.
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (file/directory, tier, destinazione, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Esegue i probe delle dipendenze esterne (python3, PyPDF2, gs)
//! 4. Accoda gli input deduplicati e avvia il BatchRunner
//! 5. Riporta storico, warning ed errori della batch
//!
//! ## Esempio di utilizzo:
//! ```bash
//! pdf-squeeze report.pdf scans/ --tier ultra --save-to desktop --open-after
//! ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use pdf_squeeze::file_manager::FileManager;
use pdf_squeeze::{
    probes, BatchRunner, CompressionTier, Config, SaveLocation, ScriptInvoker, Session,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Basic,
    Advanced,
    Ultra,
}

impl From<TierArg> for CompressionTier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Basic => Self::Basic,
            TierArg::Advanced => Self::Advanced,
            TierArg::Ultra => Self::Ultra,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SaveArg {
    SameFolder,
    Desktop,
    Documents,
}

impl From<SaveArg> for SaveLocation {
    fn from(arg: SaveArg) -> Self {
        match arg {
            SaveArg::SameFolder => Self::SameFolder,
            SaveArg::Desktop => Self::Desktop,
            SaveArg::Documents => Self::Documents,
        }
    }
}

#[derive(Parser)]
#[command(name = "pdf-squeeze")]
#[command(about = "Compress PDF files in batch using external tools")]
struct Args {
    /// PDF files or directories to compress (directories are scanned recursively)
    inputs: Vec<PathBuf>,

    /// Compression tier (ultra requires Ghostscript)
    #[arg(short, long)]
    tier: Option<TierArg>,

    /// Where to save the compressed copies
    #[arg(short, long)]
    save_to: Option<SaveArg>,

    /// Open each compressed file with the system handler
    #[arg(long)]
    open_after: bool,

    /// Refuse to run instead of degrading ultra to advanced when Ghostscript is missing
    #[arg(long)]
    no_fallback: bool,

    /// Emit progress and results as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Load defaults from a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only probe the external dependencies and print a report
    #[arg(long)]
    check_deps: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let report = probes::check_dependencies().await;

    if args.check_deps {
        println!("{}", report.format_report());
        return Ok(());
    }

    if !report.essentials_present() {
        return Err(anyhow::anyhow!(
            "Python 3 with PyPDF2 is required before any batch can run.\n{}",
            report.format_report()
        ));
    }

    // Config file as base, explicit CLI flags on top
    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };
    if let Some(tier) = args.tier {
        config.tier = tier.into();
    }
    if let Some(save_to) = args.save_to {
        config.save_location = save_to.into();
    }
    if args.open_after {
        config.open_after = true;
    }
    if args.no_fallback {
        config.allow_tier_fallback = false;
    }
    if args.json {
        config.json_output = true;
    }
    config.validate()?;

    if args.inputs.is_empty() {
        return Err(anyhow::anyhow!("No input files given"));
    }

    let files = FileManager::collect_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err(anyhow::anyhow!("No PDF files found in the given inputs"));
    }

    let mut session = Session::new();
    for file in files {
        session.queue.add(file);
    }
    info!("{} file(s) queued", session.queue.count());

    let invoker = ScriptInvoker::new()?;
    let mut runner = BatchRunner::new(config.clone(), invoker, report.ghostscript)?;
    let batch = runner.run(&mut session).await?;

    if !config.json_output {
        info!("=== Batch Complete ===");
        info!("{}", batch.format_summary());
        for record in session.history.records() {
            info!(
                "  {} -> {} ({} -> {}, {:.1}% saved)",
                record.original_path.display(),
                record.output_path.display(),
                FileManager::format_size(record.original_bytes),
                FileManager::format_size(record.compressed_bytes),
                record.reduction_percent,
            );
        }
        for warning in &batch.warnings {
            warn!("{}", warning);
        }
        for error in &batch.errors {
            warn!("Failed: {}", error);
        }
    }

    Ok(())
}
