//! # Process Runner
//!
//! Avvia il tool esterno e ne espone l'output come stream di righe.
//!
//! ## Responsabilità:
//! - Verifica che l'eseguibile sia risolvibile prima di qualsiasi spawn
//! - Costruisce gli argomenti fissi di ocrmypdf
//! - Unisce stdout e stderr in un'unica sequenza di righe, in ordine di arrivo
//! - Replica ogni riga letta su un sink secondario (console / tracing)
//! - Riporta l'exit status dopo che lo stream è esaurito
//!
//! ## Astrazione:
//! Il job dipende solo da `ProcessLauncher` ("trova, avvia, leggi righe,
//! exit status"). `SystemLauncher` è l'implementazione reale basata su
//! `tokio::process`; i test ne iniettano una finta.

use crate::error::CompressError;
use crate::tool_resolver::ToolPathResolver;
use futures::future::BoxFuture;
use futures::stream::{BoxStream, StreamExt};
use std::io::{self, BufRead, PipeReader};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

/// Executable wrapped by the compressor
pub const OCRMYPDF: &str = "ocrmypdf";

/// Fixed ocrmypdf argument template; order and spelling matter
pub fn ocrmypdf_args(quality: u8, input_path: &Path, output_path: &Path) -> Vec<String> {
    vec![
        "--optimize".to_string(),
        "3".to_string(),
        "--output-type".to_string(),
        "pdf".to_string(),
        "--jpeg-quality".to_string(),
        quality.to_string(),
        "--skip-text".to_string(),
        "--deskew".to_string(),
        input_path.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
    ]
}

/// Exit status of a finished process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// `None` when the process was terminated by a signal
    code: Option<i32>,
}

impl ProcessExit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// A spawned process: its merged output lines and its eventual exit status
pub struct RunningProcess {
    pub lines: BoxStream<'static, io::Result<String>>,
    pub exit: BoxFuture<'static, io::Result<ProcessExit>>,
}

/// "Spawn process, stream lines, get exit status" capability
pub trait ProcessLauncher: Send + Sync {
    /// Resolve an executable name to a path, `None` if it is not installed
    fn locate(&self, executable: &str) -> Option<PathBuf>;

    /// Spawn `program` with `args`, capturing stdout and stderr together
    fn launch(&self, program: &Path, args: &[String]) -> Result<RunningProcess, CompressError>;
}

/// Launcher backed by real child processes
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    resolver: ToolPathResolver,
}

impl SystemLauncher {
    pub fn new(resolver: ToolPathResolver) -> Self {
        Self { resolver }
    }

    /// Forward lines from the read end of the shared pipe until EOF
    fn forward_lines(reader: PipeReader, tx: mpsc::UnboundedSender<io::Result<String>>) {
        for chunk in std::io::BufReader::new(reader).split(b'\n') {
            let line = chunk.map(|bytes| String::from_utf8_lossy(&bytes).trim_end().to_string());
            let failed = line.is_err();
            // Receiver gone: dropping the reader makes further writes fail in the child
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    }
}

impl ProcessLauncher for SystemLauncher {
    fn locate(&self, executable: &str) -> Option<PathBuf> {
        self.resolver.resolve_tool(executable)
    }

    fn launch(&self, program: &Path, args: &[String]) -> Result<RunningProcess, CompressError> {
        // stdout and stderr share one pipe so lines keep the order they were written in
        let (reader, writer) = std::io::pipe()?;
        let err_writer = writer.try_clone()?;

        // `cmd` drops at the end of the block with our copies of the write end,
        // so the reader sees EOF once the child has closed its own
        let mut child = {
            let mut cmd = Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(err_writer)
                .kill_on_drop(true);
            cmd.spawn().map_err(|e| {
                CompressError::Process(format!("Failed to execute {}: {}", program.display(), e))
            })?
        };

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || Self::forward_lines(reader, tx));

        Ok(RunningProcess {
            lines: UnboundedReceiverStream::new(rx).boxed(),
            exit: Box::pin(async move { child.wait().await.map(ProcessExit::from) }),
        })
    }
}

/// Secondary destination for raw output lines
pub trait LineSink: Send + Sync {
    fn line(&self, text: &str);
}

/// Mirrors tool output to the `pdf_shrink::tool` tracing target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMirror;

impl LineSink for TracingMirror {
    fn line(&self, text: &str) {
        debug!(target: "pdf_shrink::tool", "{}", text);
    }
}

/// Runs an external tool on behalf of a job
#[derive(Clone)]
pub struct ProcessRunner {
    launcher: Arc<dyn ProcessLauncher>,
    mirror: Arc<dyn LineSink>,
}

impl ProcessRunner {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            launcher,
            mirror: Arc::new(TracingMirror),
        }
    }

    /// Runner using real processes resolved from the environment
    pub fn system() -> Self {
        Self::new(Arc::new(SystemLauncher::default()))
    }

    /// Replace the sink output lines are mirrored to
    pub fn with_mirror(mut self, mirror: Arc<dyn LineSink>) -> Self {
        self.mirror = mirror;
        self
    }

    /// Fail fast if `executable` cannot be found; nothing is spawned
    pub fn locate(&self, executable: &str) -> Result<PathBuf, CompressError> {
        self.launcher
            .locate(executable)
            .ok_or_else(|| CompressError::MissingDependency(executable.to_string()))
    }

    /// Spawn the process and hand back a live handle
    pub fn start(&self, program: &Path, args: &[String]) -> Result<ProcessHandle, CompressError> {
        debug!("Spawning {} {:?}", program.display(), args);
        let RunningProcess { lines, exit } = self.launcher.launch(program, args)?;

        Ok(ProcessHandle {
            lines,
            exit,
            mirror: Arc::clone(&self.mirror),
        })
    }
}

/// Live handle on a spawned process
pub struct ProcessHandle {
    lines: BoxStream<'static, io::Result<String>>,
    exit: BoxFuture<'static, io::Result<ProcessExit>>,
    mirror: Arc<dyn LineSink>,
}

impl ProcessHandle {
    /// Next output line, mirrored as it is read. `None` once output is closed.
    pub async fn next_line(&mut self) -> Option<Result<String, CompressError>> {
        let line = self.lines.next().await?;
        Some(
            line.map(|text| {
                self.mirror.line(&text);
                text
            })
            .map_err(CompressError::from),
        )
    }

    /// Wait for the process to exit and reap it.
    ///
    /// The output stream is closed first: a process whose output was
    /// abandoned after a read error fails its next write instead of blocking.
    pub async fn wait(self) -> Result<ProcessExit, CompressError> {
        let Self { lines, exit, .. } = self;
        drop(lines);
        Ok(exit.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_argument_template() {
        let args = ocrmypdf_args(35, Path::new("/in/a.pdf"), Path::new("/out/a_compressed_q35.pdf"));
        assert_eq!(
            args,
            vec![
                "--optimize",
                "3",
                "--output-type",
                "pdf",
                "--jpeg-quality",
                "35",
                "--skip-text",
                "--deskew",
                "/in/a.pdf",
                "/out/a_compressed_q35.pdf",
            ]
        );
    }

    #[test]
    fn test_exit_status() {
        assert!(ProcessExit::from_code(0).success());
        assert!(!ProcessExit::from_code(2).success());
        assert_eq!(ProcessExit::from_code(2).code(), Some(2));
    }

    #[test]
    fn test_locate_missing_tool() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = ProcessRunner::new(Arc::new(SystemLauncher::new(
            ToolPathResolver::with_search_dirs(vec![dir.path().to_path_buf()]),
        )));
        assert!(matches!(
            runner.locate(OCRMYPDF),
            Err(CompressError::MissingDependency(name)) if name == OCRMYPDF
        ));
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl LineSink for Collect {
        fn line(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_streams_merged_output_in_order_and_mirrors() {
        let sink = Arc::new(Collect::default());
        let runner = ProcessRunner::system().with_mirror(sink.clone());

        let script = "echo out-1; echo err-1 >&2; printf 'no-newline'; exit 3".to_string();
        let mut handle = runner
            .start(Path::new("/bin/sh"), &["-c".to_string(), script])
            .unwrap();

        let mut lines = Vec::new();
        while let Some(line) = handle.next_line().await {
            lines.push(line.unwrap());
        }
        let exit = handle.wait().await.unwrap();

        assert_eq!(lines, vec!["out-1", "err-1", "no-newline"]);
        assert_eq!(sink.0.lock().unwrap().len(), 3);
        assert_eq!(exit.code(), Some(3));
        assert!(!exit.success());
    }

    #[tokio::test]
    async fn test_spawn_failure_is_process_error() {
        let runner = ProcessRunner::system();
        let result = runner.start(Path::new("/nonexistent/definitely-not-a-tool"), &[]);
        assert!(matches!(result, Err(CompressError::Process(_))));
    }
}
