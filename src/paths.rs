//! # Output Path Resolution Module
//!
//! Centralizza il calcolo dei path di output per i PDF compressi.
//! Mai sovrascrivere un file esistente: in caso di collisione viene
//! aggiunto un suffisso numerico `(N)` prima dell'estensione.

use crate::config::SaveLocation;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Computes unique destination paths for compressed copies.
/// Pure with respect to the filesystem except for existence checks.
pub struct OutputPathResolver;

impl OutputPathResolver {
    /// Resolve the destination path for an input file under a save policy.
    ///
    /// The candidate name is `{stem}_compressed.pdf`; existing files bump a
    /// numeric suffix, `{stem}_compressed(1).pdf`, `(2)`, and so on until a
    /// free path is found.
    pub fn resolve(input_path: &Path, policy: SaveLocation) -> Result<PathBuf> {
        let stem = input_path
            .file_stem()
            .ok_or_else(|| {
                anyhow::anyhow!("Invalid file name: {}", input_path.display())
            })?
            .to_string_lossy();

        let target_dir = Self::target_directory(input_path, policy)?;

        let mut candidate = target_dir.join(format!("{}_compressed.pdf", stem));
        let mut counter = 1u32;
        while candidate.exists() {
            candidate = target_dir.join(format!("{}_compressed({}).pdf", stem, counter));
            counter += 1;
        }

        debug!(
            "Resolved output path: {} -> {}",
            input_path.display(),
            candidate.display()
        );
        Ok(candidate)
    }

    /// Resolve the save policy to a concrete directory
    fn target_directory(input_path: &Path, policy: SaveLocation) -> Result<PathBuf> {
        match policy {
            SaveLocation::SameFolder => input_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Input file has no parent directory: {}",
                        input_path.display()
                    )
                }),
            SaveLocation::Desktop => dirs::desktop_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not locate the Desktop directory")),
            SaveLocation::Documents => dirs::document_dir().ok_or_else(|| {
                anyhow::anyhow!("Could not locate the Documents directory")
            }),
        }
    }
}
