//! # PDF Shrink Library
//!
//! Riduce la dimensione dei PDF delegando il lavoro a `ocrmypdf` e
//! trasformandone l'output in eventi di log e progress.
//!
//! ## Architettura dei moduli:
//! - `config`: Parametri del job, validazione e preset JSON
//! - `error`: Tipi di errore custom
//! - `job`: Orchestratore, runner del processo, parser del progress, path di output
//! - `tool_resolver`: Ricerca degli eseguibili esterni
//! - `progress`: Progress bar da terminale
//! - `json_output`: Eventi come righe JSON
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use pdf_shrink::{CompressionJob, JobConfig, ProcessRunner};
//!
//! # async fn demo() {
//! let handle = CompressionJob::new(ProcessRunner::system())
//!     .spawn(JobConfig::new("scan.pdf"));
//! let result = handle.wait().await;
//! # }
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod json_output;
pub mod progress;
pub mod tool_resolver;

pub use config::JobConfig;
pub use error::CompressError;
pub use job::{CompressionJob, JobEvent, JobHandle, JobResult, JobState, ProcessRunner};
pub use tool_resolver::ToolPathResolver;
