//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei PDF e le utilità sui file.
//!
//! ## Responsabilità:
//! - Espansione degli input CLI: file singoli o directory (ricorsiva)
//! - Riconoscimento dei PDF per estensione
//! - Formattazione human-readable delle dimensioni
//!
//! Gli originali non vengono mai cancellati o sovrascritti: questo modulo
//! fa solo letture.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// PDF discovery and file utilities
pub struct FileManager;

impl FileManager {
    /// Check if a path looks like a PDF file
    pub fn is_pdf(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }

    /// Find all PDF files under a directory, recursively
    pub fn find_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_pdf(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Expand CLI inputs: PDFs pass through, directories are scanned,
    /// missing paths and non-PDFs are skipped with a warning
    pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_dir() {
                files.extend(Self::find_pdf_files(input)?);
            } else if !input.exists() {
                warn!("Skipping missing input: {}", input.display());
            } else if Self::is_pdf(input) {
                files.push(input.clone());
            } else {
                warn!("Skipping non-PDF input: {}", input.display());
            }
        }

        Ok(files)
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_pdf() {
        assert!(FileManager::is_pdf(Path::new("a.pdf")));
        assert!(FileManager::is_pdf(Path::new("b.PDF")));
        assert!(!FileManager::is_pdf(Path::new("c.txt")));
        assert!(!FileManager::is_pdf(Path::new("noext")));
    }

    #[test]
    fn test_find_pdf_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.pdf"), b"%PDF").unwrap();
        std::fs::write(temp_dir.path().join("skip.txt"), b"x").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
        std::fs::write(temp_dir.path().join("sub/b.pdf"), b"%PDF").unwrap();

        let files = FileManager::find_pdf_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_inputs_mixes_files_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let single = temp_dir.path().join("single.pdf");
        std::fs::write(&single, b"%PDF").unwrap();
        let sub = temp_dir.path().join("batch");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("x.pdf"), b"%PDF").unwrap();
        std::fs::write(sub.join("y.pdf"), b"%PDF").unwrap();

        let files =
            FileManager::collect_inputs(&[single.clone(), sub.clone()]).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.contains(&single));
    }

    #[test]
    fn test_collect_inputs_skips_missing_and_non_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.pdf");
        std::fs::write(&real, b"%PDF").unwrap();
        let text = temp_dir.path().join("notes.txt");
        std::fs::write(&text, b"x").unwrap();
        let missing = temp_dir.path().join("gone.pdf");

        let files =
            FileManager::collect_inputs(&[real.clone(), text, missing]).unwrap();
        assert_eq!(files, vec![real]);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }
}
