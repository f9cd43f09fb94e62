//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione di un singolo job di compressione.
//!
//! ## Responsabilità:
//! - Definisce la struct `JobConfig` con i parametri di un job
//! - Fornisce la validazione lato chiamante dei parametri
//! - Supporta caricamento/salvataggio di un preset da/verso file JSON
//! - Fornisce valori di default sensati (quality 40, output accanto all'input)
//!
//! ## Parametri di configurazione:
//! - `input_path`: PDF da comprimere
//! - `output_dir`: Directory di output (creata se non esiste)
//! - `quality`: Qualità JPEG passata al tool (15-50, default: 40)
//! - `output_filename`: Nome esplicito del file di output (opzionale)
//!
//! ## Validazione:
//! La validazione è responsabilità del chiamante: `CompressionJob` non la
//! invoca e passa la qualità al tool così com'è.
//!
//! ## Esempio:
//! ```rust
//! use pdf_shrink::JobConfig;
//!
//! let config = JobConfig {
//!     quality: 25,
//!     ..JobConfig::new("/docs/report.pdf")
//! };
//! assert_eq!(config.output_dir, std::path::PathBuf::from("/docs"));
//! ```

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Accepted JPEG quality range
pub const QUALITY_RANGE: RangeInclusive<u8> = 15..=50;

/// Quality used when the caller does not pick one
pub const DEFAULT_QUALITY: u8 = 40;

/// Configuration for one compression job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// PDF to compress
    pub input_path: PathBuf,
    /// Destination directory (created recursively if absent)
    pub output_dir: PathBuf,
    /// JPEG quality handed to the tool (15-50)
    pub quality: u8,
    /// Explicit output file name; a default is derived when `None` or blank
    #[serde(default)]
    pub output_filename: Option<String>,
}

impl JobConfig {
    /// Build a config with default quality, writing next to the input file
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let output_dir = input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            input_path,
            output_dir,
            quality: DEFAULT_QUALITY,
            output_filename: None,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), CompressError> {
        if !QUALITY_RANGE.contains(&self.quality) {
            return Err(CompressError::Validation(format!(
                "Quality must be between {} and {}, got {}",
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end(),
                self.quality
            )));
        }

        if !self.input_path.exists() {
            return Err(CompressError::Validation(format!(
                "Input file does not exist: {}",
                self.input_path.display()
            )));
        }
        if !self.input_path.is_file() {
            return Err(CompressError::Validation(format!(
                "Input path is not a file: {}",
                self.input_path.display()
            )));
        }

        if self.output_dir.is_file() {
            return Err(CompressError::Validation(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            )));
        }

        // A name with separators would escape the output directory
        if let Some(name) = self.explicit_filename() {
            if Path::new(name).file_name().map(|f| f != name).unwrap_or(true) {
                return Err(CompressError::Validation(format!(
                    "Output filename must be a plain file name: {}",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Explicit output name, ignoring blank values
    pub fn explicit_filename(&self) -> Option<&str> {
        self.output_filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Load a preset from file; a missing file yields `fallback` untouched
    pub async fn from_file(path: &Path, fallback: Self) -> Result<Self, CompressError> {
        if !path.exists() {
            return Ok(fallback);
        }

        let content = tokio::fs::read_to_string(path).await?;
        let preset: Preset = serde_json::from_str(&content)?;
        Ok(preset.apply(fallback))
    }

    /// Save the reusable part of this config (output dir, quality, name) as a preset
    pub async fn save_to_file(&self, path: &Path) -> Result<(), CompressError> {
        let preset = Preset {
            output_dir: Some(self.output_dir.clone()),
            quality: Some(self.quality),
            output_filename: self.output_filename.clone(),
        };
        let content = serde_json::to_string_pretty(&preset)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Job settings that can be reused across input files
#[derive(Debug, Default, Serialize, Deserialize)]
struct Preset {
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    quality: Option<u8>,
    #[serde(default)]
    output_filename: Option<String>,
}

impl Preset {
    fn apply(self, mut config: JobConfig) -> JobConfig {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if self.output_filename.is_some() {
            config.output_filename = self.output_filename;
        }
        config
    }
}
