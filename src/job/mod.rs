//! # Job Module
//!
//! Separa le responsabilità del job di compressione in sottomoduli:
//! - `compression_job`: Orchestratore e macchina a stati
//! - `runner`: Avvio del tool esterno e stream delle righe
//! - `progress_parser`: Estrazione percentuale dalle righe di output
//! - `path_resolver`: Calcolo del path di output
//! - `events`: Eventi consegnati al chiamante

pub mod compression_job;
pub mod events;
pub mod path_resolver;
pub mod progress_parser;
pub mod runner;

pub use compression_job::{CompressionJob, JobHandle};
pub use events::{EventSender, JobEvent, JobResult, JobState};
pub use path_resolver::PathResolver;
pub use progress_parser::ProgressParser;
pub use runner::{LineSink, ProcessLauncher, ProcessRunner, SystemLauncher};
