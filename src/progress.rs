//! # Progress Display Module
//!
//! Consumatore da terminale degli eventi di un job.
//!
//! ## Responsabilità:
//! - Progress bar con `indicatif` alimentata dagli eventi `Progress`
//! - Log scorrevole: ogni `LogLine` viene stampata sopra la barra
//! - Messaggio finale di successo o fallimento
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:42] [=========================>--------------]  64% report.pdf
//! ```

use crate::job::{JobEvent, JobResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Message shown when a job fails
pub const FAILURE_MESSAGE: &str = "Compression failed. Check the log.";

/// Renders job events on the terminal
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
    show_log: bool,
}

impl ProgressManager {
    /// Create a percentage bar labelled with `name`
    pub fn new(name: &str, show_log: bool) -> Self {
        let bar = ProgressBar::new(100);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_message(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, show_log }
    }

    /// Hidden manager, for non-interactive output
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            show_log: false,
        }
    }

    /// Apply one job event to the display
    pub fn handle(&self, event: &JobEvent) {
        match event {
            JobEvent::LogLine(line) => {
                if self.show_log {
                    self.bar.println(line);
                }
            }
            JobEvent::Progress(percent) => self.bar.set_position(u64::from(*percent)),
            JobEvent::Finished(result) => self.finish(result),
        }
    }

    /// Current bar position
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finish(&self, result: &JobResult) {
        match result.output_path {
            Some(ref output) if result.success => {
                self.bar.set_position(100);
                self.bar
                    .finish_with_message(format!("Output saved to: {}", output.display()));
            }
            _ => self.bar.abandon_with_message(FAILURE_MESSAGE),
        }
    }
}
