//! Recording-to-summary pipeline.
//!
//! One webhook-delivered recording event drives one run:
//! fetch the media, transcribe it, summarize the transcript, email the
//! digest. The first three stages are fatal on failure; notification is
//! best-effort.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::fetch::{FetchError, RecordingFetcher};
use crate::notification::{Mailer, MeetingDigest, NotificationOutcome};
use crate::summarization::Summarizer;
use crate::transcription::{Transcriber, TranscriptionError};

mod artifact;

pub use artifact::AudioArtifact;

/// Recording lifecycle state as reported by the conferencing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    InProgress,
    Completed,
    Absent,
    Failed,
}

impl RecordingStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "absent" => Some(Self::Absent),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One provider-pushed recording event; immutable, identifies one run.
#[derive(Debug, Clone)]
pub struct RecordingEvent {
    pub recording_sid: String,
    pub status: RecordingStatus,
    pub media_url: String,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("recording fetch failed for {recording_sid}: {source}")]
    Fetch {
        recording_sid: String,
        #[source]
        source: FetchError,
    },
    #[error("transcription failed for {recording_sid}: {source}")]
    Transcription {
        recording_sid: String,
        #[source]
        source: TranscriptionError,
    },
    /// Carries the already-computed transcript so the failure report can
    /// surface it even though no summary was produced.
    #[error("summarization failed for {recording_sid}: {source}")]
    Summarization {
        recording_sid: String,
        transcript: String,
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Transcription { .. } => "transcription",
            Self::Summarization { .. } => "summarization",
        }
    }

    pub fn recording_sid(&self) -> &str {
        match self {
            Self::Fetch { recording_sid, .. }
            | Self::Transcription { recording_sid, .. }
            | Self::Summarization { recording_sid, .. } => recording_sid,
        }
    }

    /// Full diagnostic text for the log. A summarization failure still
    /// holds the transcript that was already computed, so it is included
    /// here rather than lost with the run.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Summarization { transcript, .. } => {
                format!("{self}; transcript: {transcript}")
            }
            _ => self.to_string(),
        }
    }
}

/// Successful run report: the expensive work (transcript + summary) plus
/// the best-effort notification outcome.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub recording_sid: String,
    pub transcript: String,
    pub summary: String,
    pub notification: NotificationOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The provider will deliver a later event when recording finishes.
    NotCompleted,
    /// A run for this recording already started or finished.
    Duplicate,
}

/// Discriminated outcome of handing one event to the orchestrator.
#[derive(Debug)]
pub enum RunOutcome {
    Skipped(SkipReason),
    Completed(RunReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    InProgress,
    Done,
}

/// Cap on remembered runs; done marks beyond this are swept.
const MAX_TRACKED_RUNS: usize = 1024;

/// In-memory idempotency guard keyed by recording sid. The provider
/// promises at most one `completed` event per recording; this guard makes
/// the promise explicit instead of trusting it.
#[derive(Default)]
struct RunRegistry {
    runs: Mutex<HashMap<String, RunState>>,
}

impl RunRegistry {
    /// Marks a sid in-progress. Returns false when a run for it already
    /// started or finished.
    fn begin(&self, recording_sid: &str) -> bool {
        let mut runs = self.runs.lock().expect("run registry poisoned");
        if runs.contains_key(recording_sid) {
            return false;
        }
        // Done marks only suppress duplicate deliveries; sweep them once
        // the map hits its cap instead of growing for the process lifetime.
        if runs.len() >= MAX_TRACKED_RUNS {
            runs.retain(|_, state| *state == RunState::InProgress);
        }
        runs.insert(recording_sid.to_string(), RunState::InProgress);
        true
    }

    /// A successful run stays marked done; a failed run is cleared so a
    /// provider redelivery can retry.
    fn finish(&self, recording_sid: &str, success: bool) {
        let mut runs = self.runs.lock().expect("run registry poisoned");
        if success {
            runs.insert(recording_sid.to_string(), RunState::Done);
        } else {
            runs.remove(recording_sid);
        }
    }
}

/// Coordinates fetch, transcription, summarization and notification for a
/// single recording event. All collaborators are injected.
pub struct Orchestrator {
    fetcher: Box<dyn RecordingFetcher>,
    transcriber: Transcriber,
    summarizer: Box<dyn Summarizer>,
    mailer: Box<dyn Mailer>,
    recipients: Vec<String>,
    registry: RunRegistry,
}

impl Orchestrator {
    pub fn new(
        fetcher: Box<dyn RecordingFetcher>,
        transcriber: Transcriber,
        summarizer: Box<dyn Summarizer>,
        mailer: Box<dyn Mailer>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            transcriber,
            summarizer,
            mailer,
            recipients,
            registry: RunRegistry::default(),
        }
    }

    pub async fn run(&self, event: &RecordingEvent) -> Result<RunOutcome, PipelineError> {
        if event.status != RecordingStatus::Completed {
            info!(
                "Recording {} reported status {:?}; acknowledging without action",
                event.recording_sid, event.status
            );
            return Ok(RunOutcome::Skipped(SkipReason::NotCompleted));
        }

        if !self.registry.begin(&event.recording_sid) {
            warn!(
                "Recording {} already handled; skipping duplicate event",
                event.recording_sid
            );
            return Ok(RunOutcome::Skipped(SkipReason::Duplicate));
        }

        let result = self.execute(event).await;
        self.registry.finish(&event.recording_sid, result.is_ok());
        result.map(RunOutcome::Completed)
    }

    async fn execute(&self, event: &RecordingEvent) -> Result<RunReport, PipelineError> {
        let sid = &event.recording_sid;
        info!("Starting recording pipeline for {}", sid);

        let bytes =
            self.fetcher
                .fetch(&event.media_url)
                .await
                .map_err(|source| PipelineError::Fetch {
                    recording_sid: sid.clone(),
                    source,
                })?;

        let mut artifact =
            AudioArtifact::create(sid, &bytes).map_err(|e| PipelineError::Fetch {
                recording_sid: sid.clone(),
                source: FetchError::Transport(
                    anyhow::Error::new(e).context("Failed to stage recording audio"),
                ),
            })?;

        let transcribed = self.transcriber.transcribe(artifact.path()).await;
        // The artifact's lifetime ends with transcription, success or not.
        artifact.cleanup();

        let transcript = transcribed.map_err(|source| PipelineError::Transcription {
            recording_sid: sid.clone(),
            source,
        })?;

        let summary = self.summarizer.summarize(&transcript).await.map_err(|source| {
            PipelineError::Summarization {
                recording_sid: sid.clone(),
                transcript: transcript.clone(),
                source,
            }
        })?;

        let digest = MeetingDigest {
            recording_sid: sid.clone(),
            transcript: transcript.clone(),
            summary: summary.clone(),
        };
        let notification = self.notify(&digest).await;

        info!("Recording pipeline for {} complete", sid);
        Ok(RunReport {
            recording_sid: sid.clone(),
            transcript,
            summary,
            notification,
        })
    }

    /// Losing the notification after the expensive work is done is
    /// non-fatal; the failure is logged and recorded in the outcome.
    async fn notify(&self, digest: &MeetingDigest) -> NotificationOutcome {
        let recipients = self.recipients.clone();
        match self.mailer.send(digest, &recipients).await {
            Ok(()) => NotificationOutcome {
                recipients,
                delivered: true,
            },
            Err(e) => {
                warn!(
                    "Notification delivery failed for {} (run still succeeds): {}",
                    digest.recording_sid, e
                );
                NotificationOutcome {
                    recipients,
                    delivered: false,
                }
            }
        }
    }
}
