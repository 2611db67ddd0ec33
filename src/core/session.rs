//! The owned session state shared by ingestion, submission and rendering.
//!
//! Holds the current [`Selection`] (with its [`Preview`]) and the single live
//! [`ProcessingState`]. Every change is announced as a [`SessionEvent`] on a
//! broadcast channel; the processing state is also published on a `watch` channel
//! for read-only consumers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::core::filters::FilterChoice;
use crate::core::preview::{Preview, PreviewStore};
use crate::core::selection::{Selection, SelectionInfo};
use crate::utils::{SubmitFailure, ValidationError};

const EVENT_CAPACITY: usize = 64;

/// What a succeeded submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResult {
    /// Name of the source file that was uploaded
    pub filename: String,
    pub filter: FilterChoice,
    /// `uploaded_image` path reported by the server, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_path: Option<String>,
    /// `processed_image` path reported by the server, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_path: Option<String>,
}

impl ProcessedResult {
    pub fn new(filename: impl Into<String>, filter: FilterChoice) -> Self {
        Self {
            filename: filename.into(),
            filter,
            uploaded_path: None,
            processed_path: None,
        }
    }

    /// Artifact name under `/processed/`: `{filter}_{filename}`.
    pub fn processed_reference(&self) -> String {
        format!("{}_{}", self.filter.id(), self.filename)
    }

    /// Suggested name for a saved copy: `{filter}_processed_{filename}`.
    pub fn download_name(&self) -> String {
        format!("{}_processed_{}", self.filter.id(), self.filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Server,
    Transport,
}

/// Lifecycle of the current submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ProcessingState {
    #[default]
    Idle,
    InFlight { filter: FilterChoice },
    Succeeded(ProcessedResult),
    Failed { kind: FailureKind, message: String },
}

impl ProcessingState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    pub fn succeeded(&self) -> Option<&ProcessedResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

impl From<SubmitFailure> for ProcessingState {
    fn from(failure: SubmitFailure) -> Self {
        let kind = match failure {
            SubmitFailure::Server { .. } => FailureKind::Server,
            SubmitFailure::Transport { .. } => FailureKind::Transport,
        };
        Self::Failed {
            kind,
            message: failure.to_string(),
        }
    }
}

/// Notifications pushed to the shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    SelectionChanged { selection: Option<SelectionInfo> },
    ProcessingChanged { ticket: u64, state: ProcessingState },
    SubmissionDiscarded { ticket: u64 },
    DropZoneChanged { active: bool },
}

/// Issued by [`Session::begin_submission`]; carries everything the request needs.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub seq: u64,
    pub selection: Selection,
    pub filter: FilterChoice,
}

struct ActiveSelection {
    selection: Selection,
    preview: Preview,
}

#[derive(Default)]
struct SessionInner {
    current: Option<ActiveSelection>,
    /// Highest ticket handed out; only its holder may resolve the state.
    latest_ticket: u64,
    /// Highest ingestion sequence handed out; only its holder may install a selection.
    latest_ingest: u64,
}

pub struct Session {
    inner: Mutex<SessionInner>,
    processing: watch::Sender<ProcessingState>,
    events: broadcast::Sender<SessionEvent>,
    previews: Arc<PreviewStore>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_previews(PreviewStore::new())
    }

    pub fn with_previews(previews: Arc<PreviewStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Mutex::new(SessionInner::default()),
            processing: watch::Sender::new(ProcessingState::Idle),
            events,
            previews,
        }
    }

    pub fn previews(&self) -> &Arc<PreviewStore> {
        &self.previews
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn watch_processing(&self) -> watch::Receiver<ProcessingState> {
        self.processing.subscribe()
    }

    pub fn processing_state(&self) -> ProcessingState {
        self.processing.borrow().clone()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.lock().current.as_ref().map(|active| active.selection.clone())
    }

    pub fn selection_info(&self) -> Option<SelectionInfo> {
        self.lock().current.as_ref().map(ActiveSelection::info)
    }

    /// Reserves the next ingestion sequence number.
    ///
    /// Issuing one supersedes every ingestion still in progress.
    pub fn begin_ingest(&self) -> u64 {
        let mut inner = self.lock();
        inner.latest_ingest += 1;
        inner.latest_ingest
    }

    /// Installs `selection` if `seq` is still the latest ingestion.
    ///
    /// The previous preview is released, any in-flight ticket is invalidated and
    /// the processing state returns to `Idle`. A stale selection is dropped
    /// together with its preview and `None` is returned.
    pub fn install_selection(&self, seq: u64, selection: Selection) -> Option<SelectionInfo> {
        let preview = self.previews.create(selection.data().clone(), selection.mime());
        let active = ActiveSelection { selection, preview };
        let info = active.info();

        let previous = {
            let mut inner = self.lock();
            if seq != inner.latest_ingest {
                debug!(
                    "Discarding selection {} from ingestion {} (latest is {})",
                    info.name, seq, inner.latest_ingest
                );
                return None;
            }
            let previous = inner.current.replace(active);
            inner.latest_ticket += 1;
            let ticket = inner.latest_ticket;
            self.emit(SessionEvent::SelectionChanged { selection: Some(info.clone()) });
            self.reset_processing(ticket);
            previous
        };

        if let Some(previous) = previous {
            debug!("Replacing selection {}", previous.selection.name());
        }
        info!("Selected {} ({} bytes)", info.name, info.size);
        Some(info)
    }

    /// Installs `selection` as a fresh ingestion of its own.
    #[cfg(test)]
    pub(crate) fn replace_selection(&self, selection: Selection) -> SelectionInfo {
        let seq = self.begin_ingest();
        self.install_selection(seq, selection)
            .expect("no ingestion can start in between")
    }

    /// Moves the state to `InFlight` and hands out a fresh ticket.
    pub fn begin_submission(&self, filter: FilterChoice) -> Result<SubmissionTicket, ValidationError> {
        let mut inner = self.lock();
        let selection = inner
            .current
            .as_ref()
            .map(|active| active.selection.clone())
            .ok_or(ValidationError::NoFileSelected)?;

        inner.latest_ticket += 1;
        let seq = inner.latest_ticket;
        let state = ProcessingState::InFlight { filter };
        self.processing.send_replace(state.clone());
        self.emit(SessionEvent::ProcessingChanged { ticket: seq, state });

        Ok(SubmissionTicket { seq, selection, filter })
    }

    /// Applies a terminal state if `ticket` is still the latest one.
    ///
    /// Returns `false` when a newer submission or a selection change superseded it.
    pub fn resolve(&self, ticket: &SubmissionTicket, state: ProcessingState) -> bool {
        let inner = self.lock();
        if ticket.seq != inner.latest_ticket {
            debug!(
                "Discarding stale result of submission {} (latest is {})",
                ticket.seq, inner.latest_ticket
            );
            self.emit(SessionEvent::SubmissionDiscarded { ticket: ticket.seq });
            return false;
        }

        self.processing.send_replace(state.clone());
        self.emit(SessionEvent::ProcessingChanged { ticket: ticket.seq, state });
        true
    }

    /// Drops the selection and its preview, and invalidates pending submissions.
    pub fn teardown(&self) {
        let previous = {
            let mut inner = self.lock();
            let previous = inner.current.take();
            inner.latest_ticket += 1;
            inner.latest_ingest += 1;
            let ticket = inner.latest_ticket;
            if previous.is_some() {
                self.emit(SessionEvent::SelectionChanged { selection: None });
            }
            self.reset_processing(ticket);
            previous
        };
        drop(previous);
        debug!("Session torn down ({} previews live)", self.previews.live_count());
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn reset_processing(&self, ticket: u64) {
        let was_idle = self.processing.send_replace(ProcessingState::Idle) == ProcessingState::Idle;
        if !was_idle {
            self.emit(SessionEvent::ProcessingChanged { ticket, state: ProcessingState::Idle });
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSelection {
    fn info(&self) -> SelectionInfo {
        SelectionInfo {
            name: self.selection.name().to_string(),
            size: self.selection.size(),
            mime: self.selection.mime().to_string(),
            preview_url: self.preview.url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crate::core::selection::SelectionMeta;
    use crate::utils::SourceFormat;

    fn selection(name: &str) -> Selection {
        Selection::new(
            SelectionMeta { name: name.into(), size: 4, format: SourceFormat::PNG },
            Bytes::from_static(b"\x89PNG"),
        )
    }

    #[test]
    fn submitting_without_selection_is_rejected() {
        let session = Session::new();
        let err = session.begin_submission(FilterChoice::Blur).unwrap_err();
        assert_eq!(err, ValidationError::NoFileSelected);
        assert_eq!(session.processing_state(), ProcessingState::Idle);
    }

    #[test]
    fn only_the_latest_ticket_resolves() {
        let session = Session::new();
        session.replace_selection(selection("cat.png"));

        let first = session.begin_submission(FilterChoice::Blur).unwrap();
        let second = session.begin_submission(FilterChoice::Emboss).unwrap();
        assert!(second.seq > first.seq);

        let late = ProcessingState::Succeeded(ProcessedResult::new("cat.png", FilterChoice::Blur));
        assert!(!session.resolve(&first, late));
        assert_eq!(session.processing_state(), ProcessingState::InFlight { filter: FilterChoice::Emboss });

        let current = ProcessingState::Succeeded(ProcessedResult::new("cat.png", FilterChoice::Emboss));
        assert!(session.resolve(&second, current.clone()));
        assert_eq!(session.processing_state(), current);
    }

    #[test]
    fn new_selection_resets_a_shown_result() {
        let session = Session::new();
        session.replace_selection(selection("cat.png"));
        let ticket = session.begin_submission(FilterChoice::Blur).unwrap();
        session.resolve(&ticket, ProcessingState::Succeeded(ProcessedResult::new("cat.png", FilterChoice::Blur)));

        session.replace_selection(selection("dog.png"));
        assert_eq!(session.processing_state(), ProcessingState::Idle);
        assert_eq!(session.selection().unwrap().name(), "dog.png");
    }

    #[test]
    fn replacing_releases_the_previous_preview_once() {
        let session = Session::new();
        let a = session.replace_selection(selection("a.png"));
        let b = session.replace_selection(selection("b.png"));

        let previews = session.previews();
        assert_eq!(previews.live_count(), 1);
        assert_eq!(previews.released_count(), 1);
        assert!(previews.resolve(&a.preview_url).is_none());
        assert!(previews.resolve(&b.preview_url).is_some());

        session.teardown();
        assert_eq!(previews.live_count(), 0);
        assert_eq!(previews.released_count(), 2);
        assert!(session.selection().is_none());
    }

    #[test]
    fn teardown_invalidates_ingestions_in_progress() {
        let session = Session::new();
        let seq = session.begin_ingest();
        session.teardown();

        assert!(session.install_selection(seq, selection("late.png")).is_none());
        assert!(session.selection().is_none());
        assert_eq!(session.previews().live_count(), 0);

        let seq = session.begin_ingest();
        assert_eq!(session.install_selection(seq, selection("cat.png")).unwrap().name, "cat.png");
    }

    #[test]
    fn events_follow_the_lifecycle() {
        let session = Session::new();
        let mut events = session.subscribe();

        session.replace_selection(selection("cat.png"));
        let ticket = session.begin_submission(FilterChoice::Outline).unwrap();
        session.resolve(&ticket, SubmitFailure::server("Failed to load image").into());

        assert!(matches!(events.try_recv().unwrap(), SessionEvent::SelectionChanged { selection: Some(_) }));
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::ProcessingChanged { state: ProcessingState::InFlight { .. }, .. }
        ));
        match events.try_recv().unwrap() {
            SessionEvent::ProcessingChanged { state: ProcessingState::Failed { kind, message }, .. } => {
                assert_eq!(kind, FailureKind::Server);
                assert_eq!(message, "Failed to load image");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn processing_state_serializes_with_a_status_tag() {
        let state = ProcessingState::Succeeded(ProcessedResult::new("cat.png", FilterChoice::HighPass));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["filename"], "cat.png");
        assert_eq!(json["filter"], "high_pass");

        let json = serde_json::to_value(ProcessingState::Idle).unwrap();
        assert_eq!(json["status"], "idle");
    }
}
