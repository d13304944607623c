//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con i parametri di una batch di compressione
//! - Definisce i tipi enumerati `CompressionTier` e `SaveLocation`
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `tier`: livello di compressione richiesto (default: Advanced)
//! - `save_location`: dove salvare i PDF compressi (default: SameFolder)
//! - `open_after`: apre ogni file compresso con l'applicazione di sistema
//! - `allow_tier_fallback`: degrada Ultra → Advanced se Ghostscript manca
//! - `json_output`: emette eventi JSON su stdout per una UI esterna
//!
//! ## Livelli di compressione:
//! - `Basic`: ricompressione veloce degli stream
//! - `Advanced`: ricompressione completa con PyPDF2 (raccomandato)
//! - `Ultra`: Ghostscript con downsampling a 72 DPI (richiede `gs`)
//!
//! I token bajo/medio/alto sono il protocollo di linea con lo script esterno
//! e non vanno cambiati senza versionare la grammatica.
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     tier: CompressionTier::Ultra,
//!     save_location: SaveLocation::Desktop,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Requested compression aggressiveness level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionTier {
    /// Fast stream recompression
    Basic,
    /// Full PyPDF2 recompression (recommended)
    Advanced,
    /// Ghostscript with image downsampling (needs `gs`)
    Ultra,
}

impl CompressionTier {
    /// Token passed to the external script (line-grammar vocabulary)
    pub fn wire_token(&self) -> &'static str {
        match self {
            Self::Basic => "bajo",
            Self::Advanced => "medio",
            Self::Ultra => "alto",
        }
    }

    /// Map a tier token from a status line back to a tier.
    /// Unrecognized tokens fall back to Advanced.
    pub fn from_wire_token(token: &str) -> Self {
        match token {
            "bajo" => Self::Basic,
            "alto" => Self::Ultra,
            _ => Self::Advanced,
        }
    }
}

impl std::fmt::Display for CompressionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Ultra => "ultra",
        };
        write!(f, "{}", name)
    }
}

/// Where compressed copies are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveLocation {
    /// Next to the input file
    SameFolder,
    /// The user's Desktop directory
    Desktop,
    /// The user's Documents directory
    Documents,
}

impl std::fmt::Display for SaveLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SameFolder => "same-folder",
            Self::Desktop => "desktop",
            Self::Documents => "documents",
        };
        write!(f, "{}", name)
    }
}

/// Configuration for one compression batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Requested compression tier
    pub tier: CompressionTier,
    /// Save location policy for compressed copies
    pub save_location: SaveLocation,
    /// Open each compressed file with the system handler after success
    pub open_after: bool,
    /// Silently substitute Advanced when Ultra is requested without Ghostscript
    pub allow_tier_fallback: bool,
    /// Emit progress and results as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tier: CompressionTier::Advanced,
            save_location: SaveLocation::SameFolder,
            open_after: false,
            allow_tier_fallback: true,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        // Desktop/Documents must be resolvable before a batch may start;
        // SameFolder is checked per file at resolution time.
        match self.save_location {
            SaveLocation::Desktop if dirs::desktop_dir().is_none() => {
                Err(anyhow::anyhow!("Could not locate the Desktop directory"))
            }
            SaveLocation::Documents if dirs::document_dir().is_none() => {
                Err(anyhow::anyhow!("Could not locate the Documents directory"))
            }
            _ => Ok(()),
        }
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.tier, CompressionTier::Advanced);
        assert_eq!(config.save_location, SaveLocation::SameFolder);
        assert!(!config.open_after);
        assert!(config.allow_tier_fallback);
        assert!(!config.json_output);
    }

    #[test]
    fn test_wire_tokens_round_trip() {
        for tier in [
            CompressionTier::Basic,
            CompressionTier::Advanced,
            CompressionTier::Ultra,
        ] {
            assert_eq!(CompressionTier::from_wire_token(tier.wire_token()), tier);
        }
    }

    #[test]
    fn test_unknown_wire_token_defaults_to_advanced() {
        assert_eq!(
            CompressionTier::from_wire_token("garbage"),
            CompressionTier::Advanced
        );
        assert_eq!(
            CompressionTier::from_wire_token(""),
            CompressionTier::Advanced
        );
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            tier: CompressionTier::Ultra,
            save_location: SaveLocation::SameFolder,
            open_after: true,
            allow_tier_fallback: false,
            json_output: false,
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.tier, CompressionTier::Ultra);
        assert!(loaded_config.open_after);
        assert!(!loaded_config.allow_tier_fallback);
    }

    #[tokio::test]
    async fn test_config_missing_file_yields_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nope.json");

        let loaded = Config::from_file(&config_path).await.unwrap();
        assert_eq!(loaded.tier, CompressionTier::Advanced);
    }
}
