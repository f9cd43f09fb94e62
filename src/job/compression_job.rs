//! # Compression Job
//!
//! Orchestratore di un singolo tentativo di compressione.
//!
//! ## Stati:
//! `Idle → Validating → Running → Succeeded | Failed`, senza retry.
//!
//! ## Flusso:
//! 1. Verifica che ocrmypdf sia nel PATH (altrimenti `Failed` subito,
//!    senza creare directory né avviare processi)
//! 2. Crea la directory di output e calcola il path del file risultante
//! 3. Avvia il processo con gli argomenti fissi
//! 4. Ogni riga va nel log e al parser; le percentuali diventano eventi progress
//! 5. L'exit status decide l'evento terminale
//!
//! Qualsiasi errore (I/O, spawn, lettura pipe) viene scritto nel log e
//! trasformato nell'evento terminale di fallimento: nulla risale al chiamante.
//!
//! ## Esempio:
//! ```rust,no_run
//! use pdf_shrink::{CompressionJob, JobConfig, JobEvent, ProcessRunner};
//!
//! # async fn demo() {
//! let job = CompressionJob::new(ProcessRunner::system());
//! let mut handle = job.spawn(JobConfig::new("scan.pdf"));
//! while let Some(event) = handle.next_event().await {
//!     if let JobEvent::Finished(result) = event {
//!         println!("success: {}", result.success);
//!     }
//! }
//! # }
//! ```

use crate::config::JobConfig;
use crate::error::CompressError;
use crate::job::events::{EventSender, JobEvent, JobResult, JobState};
use crate::job::path_resolver::PathResolver;
use crate::job::progress_parser::ProgressParser;
use crate::job::runner::{ocrmypdf_args, ProcessRunner, OCRMYPDF};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Orchestrates one ocrmypdf run and reports it as events
pub struct CompressionJob {
    runner: ProcessRunner,
    state: JobState,
}

impl CompressionJob {
    pub fn new(runner: ProcessRunner) -> Self {
        Self {
            runner,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run the job to completion on the current task.
    ///
    /// Emits log and progress events while the tool runs, then exactly one
    /// `Finished` event carrying the returned result.
    pub async fn run(&mut self, config: JobConfig, events: &EventSender) -> JobResult {
        self.state = JobState::Idle;
        info!("🗜️  Compressing {} (quality {})", config.input_path.display(), config.quality);

        let result = match self.execute(&config, events).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Compression of {} failed: {}", config.input_path.display(), e);
                events.log_line(e.to_string());
                JobResult::failed()
            }
        };

        self.transition(if result.success {
            JobState::Succeeded
        } else {
            JobState::Failed
        });
        if let Some(ref output) = result.output_path {
            info!("✅ Output saved to {}", output.display());
        }

        events.finished(result.clone());
        result
    }

    /// Run the job on a background task and return a handle to its events
    pub fn spawn(mut self, config: JobConfig) -> JobHandle {
        let (sender, events) = EventSender::channel();
        let task = tokio::spawn(async move { self.run(config, &sender).await });
        JobHandle { events, task }
    }

    async fn execute(
        &mut self,
        config: &JobConfig,
        events: &EventSender,
    ) -> Result<JobResult, CompressError> {
        self.transition(JobState::Validating);
        let program = self.runner.locate(OCRMYPDF)?;

        tokio::fs::create_dir_all(&config.output_dir).await?;
        let output_path = PathResolver::resolve(
            &config.input_path,
            &config.output_dir,
            config.quality,
            config.explicit_filename(),
        );
        debug!("Resolved output path: {}", output_path.display());

        let args = ocrmypdf_args(config.quality, &config.input_path, &output_path);
        events.log_line(format!("Running: {} {}", OCRMYPDF, args.join(" ")));

        let mut process = self.runner.start(&program, &args)?;
        self.transition(JobState::Running);

        let mut stream_error = None;
        while let Some(line) = process.next_line().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    stream_error = Some(e);
                    break;
                }
            };
            let percent = ProgressParser::parse(&line);
            events.log_line(line);
            if let Some(percent) = percent {
                events.progress(percent);
            }
        }

        // The process is reaped even when its output could not be read
        let exit = process.wait().await?;
        if let Some(e) = stream_error {
            return Err(e);
        }
        if exit.success() {
            Ok(JobResult::succeeded(output_path))
        } else {
            warn!("{} exited with status {:?}", OCRMYPDF, exit.code());
            Ok(JobResult::failed())
        }
    }

    fn transition(&mut self, next: JobState) {
        debug!("Job state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Caller's side of a job running in the background.
///
/// Dropping the handle does not stop the job; it keeps running until the
/// tool exits.
pub struct JobHandle {
    events: mpsc::UnboundedReceiver<JobEvent>,
    task: JoinHandle<JobResult>,
}

impl JobHandle {
    /// Next event in emission order; `None` after `Finished` has been delivered
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        self.events.recv().await
    }

    /// Wait for the job to end, discarding undelivered events
    pub async fn wait(self) -> JobResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Compression task aborted: {}", e);
                JobResult::failed()
            }
        }
    }
}
