//! # Job Events
//!
//! I tre tipi di evento che un job consegna al chiamante, più il canale
//! thread-safe su cui viaggiano.
//!
//! ## Garanzie:
//! - Righe di log e progress arrivano nell'ordine prodotto dal processo
//! - `Finished` è sempre l'ultimo evento ed è emesso una sola volta

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Terminal outcome of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub success: bool,
    /// Resolved output file, `None` unless `success` is true
    pub output_path: Option<PathBuf>,
}

impl JobResult {
    pub fn succeeded(output_path: PathBuf) -> Self {
        Self {
            success: true,
            output_path: Some(output_path),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            output_path: None,
        }
    }
}

/// Event emitted by a running job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// Raw output line, or a message from the orchestrator itself
    LogLine(String),
    /// Latest known completion percentage (0-100); not guaranteed monotonic
    Progress(u8),
    /// Terminal event
    Finished(JobResult),
}

/// Lifecycle of a `CompressionJob`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Validating,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Sending half of a job's event channel
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<JobEvent>,
}

impl EventSender {
    /// Create a sender and the receiver the caller reads events from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn log_line(&self, line: impl Into<String>) {
        self.send(JobEvent::LogLine(line.into()));
    }

    pub fn progress(&self, percent: u8) {
        self.send(JobEvent::Progress(percent));
    }

    pub fn finished(&self, result: JobResult) {
        self.send(JobEvent::Finished(result));
    }

    fn send(&self, event: JobEvent) {
        // Receiver may have been dropped; the job still runs to completion
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_order() {
        let (sender, mut rx) = EventSender::channel();
        sender.log_line("a");
        sender.progress(10);
        sender.finished(JobResult::failed());

        assert_eq!(rx.try_recv().unwrap(), JobEvent::LogLine("a".into()));
        assert_eq!(rx.try_recv().unwrap(), JobEvent::Progress(10));
        assert_eq!(rx.try_recv().unwrap(), JobEvent::Finished(JobResult::failed()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (sender, rx) = EventSender::channel();
        drop(rx);
        sender.log_line("nobody listens");
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Running.is_terminal());
    }
}
