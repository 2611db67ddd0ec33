//! End-to-end session behaviour through `AppState`, with an in-memory backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast::Receiver;

use filter_studio_lib::compare::{ContainerBounds, PointerEvent, ProcessedPane, RenderPlan, ViewMode};
use filter_studio_lib::core::{Candidate, FilterChoice, ProcessingState, SessionEvent};
use filter_studio_lib::ingest::IngestSource;
use filter_studio_lib::processing::{ProcessingBackend, UploadReceipt, UploadRequest};
use filter_studio_lib::utils::{RenderError, StudioError, SubmitFailure, ValidationError};
use filter_studio_lib::{AppState, ClientConfig};

/// Accepts every upload immediately.
#[derive(Default)]
struct InstantBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl ProcessingBackend for InstantBackend {
    async fn upload(&self, _request: UploadRequest) -> Result<UploadReceipt, SubmitFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(UploadReceipt::default())
    }
}

fn app() -> (AppState, Arc<InstantBackend>) {
    let backend = Arc::new(InstantBackend::default());
    let state = AppState::with_backend(ClientConfig::default(), backend.clone()).unwrap();
    (state, backend)
}

fn png(name: &str) -> Candidate {
    Candidate::from_bytes(name, Some("image/png".into()), b"\x89PNG".to_vec())
}

fn drain(events: &mut Receiver<SessionEvent>) -> Vec<SessionEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}

#[tokio::test]
async fn drop_ingests_only_the_first_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.jpg");
    let second = dir.path().join("second.png");
    std::fs::write(&first, b"jpeg").unwrap();
    std::fs::write(&second, b"png").unwrap();

    let (state, _) = app();
    let mut events = state.subscribe();

    state.drag_over();
    state.drag_over();
    assert!(state.snapshot().drop_active);

    let info = state.drop_paths(vec![first, second]).await.unwrap().unwrap();
    assert_eq!(info.name, "first.jpg");
    assert!(!state.snapshot().drop_active);

    let events = drain(&mut events);
    assert_eq!(events[0], SessionEvent::DropZoneChanged { active: true });
    assert_eq!(events[1], SessionEvent::DropZoneChanged { active: false });
    assert!(matches!(&events[2], SessionEvent::SelectionChanged { selection: Some(s) } if s.name == "first.jpg"));
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn empty_drop_changes_nothing() {
    let (state, _) = app();
    state.drag_over();
    assert_eq!(state.drop_paths(Vec::new()).await.unwrap(), None);
    assert!(state.session().selection().is_none());
}

#[tokio::test]
async fn dropped_unsupported_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"hello").unwrap();

    let (state, _) = app();
    state.ingest(png("cat.png"), IngestSource::Browse).await.unwrap();

    let err = state.drop_paths(vec![path]).await.unwrap_err();
    assert!(matches!(err, StudioError::Validation(ValidationError::UnsupportedType { .. })));
    assert_eq!(state.session().selection().unwrap().name(), "cat.png");
}

#[tokio::test]
async fn submit_without_selection_sends_nothing() {
    let (state, backend) = app();
    let err = state.submit(FilterChoice::Blur).await.unwrap_err();
    assert_eq!(err, ValidationError::NoFileSelected);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn comparison_follows_the_session() {
    let (state, backend) = app();
    state.ingest(png("cat.png"), IngestSource::Browse).await.unwrap();

    assert!(matches!(
        state.set_view_mode(ViewMode::Slider),
        Err(StudioError::Render(RenderError::NotReady))
    ));

    state.submit(FilterChoice::Blur).await.unwrap();
    assert_eq!(state.session().processing_state().succeeded().unwrap().processed_reference(), "blur_cat.png");

    let view = state.set_view_mode(ViewMode::Slider).unwrap();
    assert_eq!(view.slider_percent, 50.0);
    // Same mode again: nothing changes and nothing is sent
    state.set_view_mode(ViewMode::Slider).unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

    let bounds = ContainerBounds { left: 0.0, width: 200.0 };
    state.pointer(PointerEvent::MouseDown, bounds);
    let view = state.pointer(PointerEvent::MouseMove { x: 50.0 }, bounds);
    assert_eq!(view.slider_percent, 25.0);
    state.pointer(PointerEvent::MouseUp, bounds);

    match state.snapshot().plan {
        RenderPlan::Slider { processed, label, percent, .. } => {
            assert_eq!(processed, "http://127.0.0.1:5000/processed/blur_cat.png");
            assert_eq!(label, "Blur");
            assert_eq!(percent, 25.0);
        }
        other => panic!("unexpected plan {other:?}"),
    }

    // A new file clears the shown result
    state.ingest(png("dog.png"), IngestSource::Drop).await.unwrap();
    let snapshot = state.snapshot();
    assert_eq!(snapshot.processing, ProcessingState::Idle);
    assert!(matches!(
        snapshot.plan,
        RenderPlan::SideBySide { processed: ProcessedPane::Awaiting, controls: false, .. }
    ));
    assert!(state.export_request().is_err());
}

#[tokio::test]
async fn teardown_releases_the_preview() {
    let (state, _) = app();
    let a = state.ingest(png("a.png"), IngestSource::Browse).await.unwrap();
    let b = state.ingest(png("b.png"), IngestSource::Browse).await.unwrap();

    let previews = Arc::clone(state.session().previews());
    assert!(previews.resolve(&a.preview_url).is_none());
    assert!(previews.resolve(&b.preview_url).is_some());

    state.teardown();
    assert_eq!(previews.live_count(), 0);
    assert_eq!(previews.released_count(), 2);
    assert_eq!(state.snapshot().plan, RenderPlan::Placeholder);
}
