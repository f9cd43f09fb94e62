//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della libreria.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare gli errori di un job
//! - Fornisce messaggi leggibili, riusati tali e quali nel log del job
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (creazione directory di output, pipe del processo)
//! - `MissingDependency`: Tool esterno non trovato nel PATH
//! - `Process`: Il tool esterno non è partito o è terminato male
//! - `Validation`: Parametri del job non validi (lato chiamante)
//! - `Config`: Preset JSON illeggibile
//!
//! Dentro `CompressionJob` nessuno di questi errori arriva al chiamante:
//! vengono tutti convertiti in una riga di log più l'evento terminale di
//! fallimento.
//!
//! ## Esempio:
//! ```rust
//! use pdf_shrink::CompressError;
//!
//! let err = CompressError::MissingDependency("ocrmypdf".to_string());
//! assert_eq!(err.to_string(), "Error: 'ocrmypdf' not found in PATH.");
//! ```

/// Custom error types for compression jobs
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Error: '{0}' not found in PATH.")]
    MissingDependency(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_keeps_underlying_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: CompressError = io.into();
        assert_eq!(err.to_string(), "permission denied");
    }

    #[test]
    fn missing_dependency_names_the_tool() {
        let err = CompressError::MissingDependency("ocrmypdf".into());
        assert!(err.to_string().contains("'ocrmypdf'"));
    }
}
