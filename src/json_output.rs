//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso programmatico.
//!
//! ## Responsabilità:
//! - Traduce ogni `JobEvent` in una riga JSON su stdout
//! - Fornisce interfaccia standardizzata per comunicazione inter-processo
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del job con i suoi parametri
//! - `log`: Riga di log
//! - `progress`: Percentuale corrente
//! - `finished`: Esito finale
//! - `error`: Errore prima dell'avvio del job

use crate::config::JobConfig;
use crate::job::JobEvent;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    Start {
        input_path: PathBuf,
        output_dir: PathBuf,
        quality: u8,
        output_filename: Option<String>,
    },
    Log {
        line: String,
    },
    Progress {
        percent: u8,
    },
    Finished {
        success: bool,
        /// Empty unless `success` is true
        output_path: String,
    },
    Error {
        message: String,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(config: &JobConfig) -> Self {
        Self::Start {
            input_path: config.input_path.clone(),
            output_dir: config.output_dir.clone(),
            quality: config.quality,
            output_filename: config.output_filename.clone(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<&JobEvent> for JsonMessage {
    fn from(event: &JobEvent) -> Self {
        match event {
            JobEvent::LogLine(line) => Self::Log { line: line.clone() },
            JobEvent::Progress(percent) => Self::Progress { percent: *percent },
            JobEvent::Finished(result) => Self::Finished {
                success: result.success,
                output_path: result
                    .output_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
        }
    }
}
