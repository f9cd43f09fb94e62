//! # PDF Shrink - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Controllo preliminare delle dipendenze esterne
//! - Avvio del job in background e visualizzazione degli eventi
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (input, output dir, quality, nome, preset)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Verifica che ocrmypdf e ghostscript siano installati
//! 4. Costruisce e valida `JobConfig`
//! 5. Avvia il job e mostra log, progress bar (o JSON) fino all'evento finale
//!
//! ## Esempio di utilizzo:
//! ```bash
//! pdf-shrink scan.pdf --quality 30 --output-dir ./small --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

use pdf_shrink::json_output::JsonMessage;
use pdf_shrink::progress::ProgressManager;
use pdf_shrink::tool_resolver::REQUIRED_TOOLS;
use pdf_shrink::{CompressionJob, JobConfig, JobEvent, ProcessRunner, ToolPathResolver};

#[derive(Parser)]
#[command(name = "pdf-shrink")]
#[command(about = "Shrink PDF files with ocrmypdf, showing live progress")]
struct Args {
    /// PDF file to compress
    #[arg(required_unless_present = "check")]
    input: Option<PathBuf>,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JPEG quality (15-50, lower = smaller file)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(15..=50))]
    quality: Option<u8>,

    /// Explicit output file name
    #[arg(short, long)]
    name: Option<String>,

    /// Load output dir, quality and name from a JSON preset
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Save the effective settings as a JSON preset
    #[arg(long)]
    save_preset: Option<PathBuf>,

    /// Emit events as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Hide the tool output and show only the progress bar
    #[arg(long)]
    quiet_log: bool,

    /// Only check that the external tools are installed
    #[arg(long)]
    check: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let missing = ToolPathResolver::new().missing_tools(&REQUIRED_TOOLS);
    if !missing.is_empty() {
        let message = format!("Missing dependencies: {}", missing.join(", "));
        if args.json {
            JsonMessage::error(message).emit();
        } else {
            eprintln!("🚨 {}", message);
        }
        return Ok(ExitCode::FAILURE);
    }
    if args.check {
        info!("All dependencies found: {}", REQUIRED_TOOLS.join(", "));
        return Ok(ExitCode::SUCCESS);
    }

    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No PDF selected."))?;
    let config = build_config(&args, input).await?;

    if let Err(e) = config.validate() {
        if args.json {
            JsonMessage::error(e.to_string()).emit();
        }
        return Err(e.into());
    }

    if let Some(ref path) = args.save_preset {
        config.save_to_file(path).await?;
        debug!("Saved preset to {}", path.display());
    }

    let display = if args.json {
        JsonMessage::start(&config).emit();
        ProgressManager::hidden()
    } else {
        let name = config
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ProgressManager::new(&name, !args.quiet_log)
    };

    let mut handle = CompressionJob::new(ProcessRunner::system()).spawn(config);
    while let Some(event) = handle.next_event().await {
        if args.json {
            JsonMessage::from(&event).emit();
        } else {
            display.handle(&event);
        }
        if matches!(event, JobEvent::Finished(_)) {
            break;
        }
    }

    let result = handle.wait().await;
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Merge preset and command line flags; flags win
async fn build_config(args: &Args, input: PathBuf) -> Result<JobConfig> {
    let mut config = JobConfig::new(input);
    if let Some(ref preset) = args.preset {
        config = JobConfig::from_file(preset, config).await?;
    }

    if let Some(ref dir) = args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if args.name.is_some() {
        config.output_filename = args.name.clone();
    }

    Ok(config)
}
