//! Application state shared with the desktop shell.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::compare::{
    ComparisonRenderer,
    ComparisonView,
    ContainerBounds,
    ExportRequest,
    PointerEvent,
    RenderPlan,
    ViewMode,
    save_export,
};
use crate::core::{Candidate, FilterChoice, ProcessingState, SelectionInfo, Session, SessionEvent};
use crate::ingest::{DropZone, IngestSource, Ingestor};
use crate::processing::{HttpProcessingClient, ProcessingBackend, SubmissionOrchestrator, SubmissionOutcome};
use crate::utils::{ClientConfig, StudioResult, ValidationError};

/// Everything the frontend needs to redraw in one round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub selection: Option<SelectionInfo>,
    pub processing: ProcessingState,
    pub view: ComparisonView,
    pub drop_active: bool,
    pub plan: RenderPlan,
}

/// Application state managed by Tauri.
///
/// Owns the session and the three components that act on it. Commands are thin
/// wrappers over these methods.
pub struct AppState {
    config: ClientConfig,
    session: Arc<Session>,
    client: Arc<HttpProcessingClient>,
    orchestrator: SubmissionOrchestrator,
    ingestor: Ingestor,
    renderer: Mutex<ComparisonRenderer>,
    drop_zone: Mutex<DropZone>,
}

impl AppState {
    /// Creates the state with the HTTP client as processing backend.
    pub fn new(config: ClientConfig) -> StudioResult<Self> {
        let client = Arc::new(HttpProcessingClient::new(&config)?);
        let backend: Arc<dyn ProcessingBackend> = client.clone();
        Ok(Self::assemble(config, client, backend))
    }

    /// Creates the state with a custom backend for submissions.
    ///
    /// The HTTP client is still built from `config` for URLs, health checks and
    /// exports.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn ProcessingBackend>) -> StudioResult<Self> {
        let client = Arc::new(HttpProcessingClient::new(&config)?);
        Ok(Self::assemble(config, client, backend))
    }

    fn assemble(config: ClientConfig, client: Arc<HttpProcessingClient>, backend: Arc<dyn ProcessingBackend>) -> Self {
        let session = Arc::new(Session::new());
        debug!("AppState targeting {}", client.endpoints().base());

        Self {
            orchestrator: SubmissionOrchestrator::new(Arc::clone(&session), backend),
            ingestor: Ingestor::new(Arc::clone(&session), config.max_upload_bytes),
            renderer: Mutex::new(ComparisonRenderer::default()),
            drop_zone: Mutex::new(DropZone::default()),
            config,
            session,
            client,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn client(&self) -> &HttpProcessingClient {
        &self.client
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    pub async fn ingest(&self, candidate: Candidate, source: IngestSource) -> StudioResult<SelectionInfo> {
        self.ingestor.ingest(candidate, source).await
    }

    pub async fn ingest_path(&self, path: impl AsRef<Path>, source: IngestSource) -> StudioResult<SelectionInfo> {
        self.ingestor.ingest_path(path, source).await
    }

    pub fn drag_over(&self) {
        if self.drop_zone().drag_over() {
            self.session.emit(SessionEvent::DropZoneChanged { active: true });
        }
    }

    pub fn drag_leave(&self) {
        if self.drop_zone().drag_leave() {
            self.session.emit(SessionEvent::DropZoneChanged { active: false });
        }
    }

    /// Ends a drag and ingests the first dropped path, if any.
    pub async fn drop_paths(&self, paths: Vec<PathBuf>) -> StudioResult<Option<SelectionInfo>> {
        let (first, was_active) = {
            let mut zone = self.drop_zone();
            let was_active = zone.is_active();
            (zone.drop_items(paths), was_active)
        };
        if was_active {
            self.session.emit(SessionEvent::DropZoneChanged { active: false });
        }

        match first {
            Some(path) => self.ingest_path(path, IngestSource::Drop).await.map(Some),
            None => {
                debug!("Drop carried no files");
                Ok(None)
            }
        }
    }

    pub async fn submit(&self, filter: FilterChoice) -> Result<SubmissionOutcome, ValidationError> {
        self.orchestrator.submit(filter).await
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> StudioResult<ComparisonView> {
        let state = self.session.processing_state();
        let mut renderer = self.renderer();
        renderer.set_mode(&state, mode)?;
        Ok(renderer.view())
    }

    pub fn pointer(&self, event: PointerEvent, bounds: ContainerBounds) -> ComparisonView {
        let state = self.session.processing_state();
        let mut renderer = self.renderer();
        renderer.handle_pointer(event, bounds, &state);
        renderer.view()
    }

    pub fn render_plan(&self) -> RenderPlan {
        let state = self.session.processing_state();
        let selection = self.session.selection_info();
        self.renderer().plan(selection.as_ref(), &state, self.client.endpoints())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let processing = self.session.processing_state();
        let selection = self.session.selection_info();
        let renderer = self.renderer();

        SessionSnapshot {
            plan: renderer.plan(selection.as_ref(), &processing, self.client.endpoints()),
            view: renderer.view(),
            drop_active: self.drop_zone().is_active(),
            selection,
            processing,
        }
    }

    pub fn export_request(&self) -> StudioResult<ExportRequest> {
        let state = self.session.processing_state();
        Ok(self.renderer().export(&state, self.client.endpoints())?)
    }

    /// Saves the current result to `dest`. Returns the bytes written.
    pub async fn export_to(&self, dest: &Path) -> StudioResult<u64> {
        let request = self.export_request()?;
        save_export(&self.client, &request, dest).await
    }

    pub async fn check_server(&self) -> bool {
        let healthy = self.client.check_health().await;
        info!("Processing server at {} is {}", self.client.endpoints().base(), if healthy { "up" } else { "down" });
        healthy
    }

    pub fn teardown(&self) {
        self.session.teardown();
    }

    fn renderer(&self) -> MutexGuard<'_, ComparisonRenderer> {
        self.renderer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn drop_zone(&self) -> MutexGuard<'_, DropZone> {
        self.drop_zone.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
