//! Turns browse and drop gestures into a validated [`Selection`].
//!
//! Both entry points funnel through [`validate_with_limit`]; nothing here touches
//! the network.

use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Candidate, Selection, SelectionInfo, Session};
use crate::utils::{
    MAX_FILE_SIZE,
    StudioError,
    StudioResult,
    candidate_from_path,
    read_candidate,
    validate_size,
    validate_with_limit,
};

/// Which gesture produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IngestSource {
    Browse,
    Drop,
}

pub struct Ingestor {
    session: Arc<Session>,
    max_bytes: u64,
}

impl Ingestor {
    /// `max_bytes` can only tighten the upload limit, never raise it past [`MAX_FILE_SIZE`].
    pub fn new(session: Arc<Session>, max_bytes: u64) -> Self {
        if max_bytes > MAX_FILE_SIZE {
            warn!("Upload limit {} exceeds {} bytes; clamping", max_bytes, MAX_FILE_SIZE);
        }
        Self {
            session,
            max_bytes: max_bytes.min(MAX_FILE_SIZE),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validates `candidate` and, on success, makes it the current selection.
    ///
    /// On failure the existing selection and processing state are left untouched.
    /// The most recently started ingestion wins: if another one starts while this
    /// one is still reading, this one ends with [`StudioError::Superseded`].
    pub async fn ingest(&self, candidate: Candidate, source: IngestSource) -> StudioResult<SelectionInfo> {
        let seq = self.session.begin_ingest();
        debug!("Ingestion {}: {} ({} bytes) via {:?}", seq, candidate.name, candidate.size, source);

        let meta = validate_with_limit(&candidate, self.max_bytes).map_err(|e| {
            warn!("Rejected {} from {:?}: {}", candidate.name, source, e);
            e
        })?;

        let data = read_candidate(&candidate).await?;
        // The file may have grown between the metadata check and the read
        validate_size(data.len() as u64, self.max_bytes)?;

        let name = meta.name.clone();
        self.session
            .install_selection(seq, Selection::new(meta, data))
            .ok_or(StudioError::Superseded(name))
    }

    pub async fn ingest_path(&self, path: impl AsRef<Path>, source: IngestSource) -> StudioResult<SelectionInfo> {
        let candidate = candidate_from_path(path).await?;
        self.ingest(candidate, source).await
    }
}

/// Highlight state of the drop target.
#[derive(Debug, Default)]
pub struct DropZone {
    active: bool,
}

impl DropZone {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drag entered or moved over the target. Returns whether the flag changed.
    pub fn drag_over(&mut self) -> bool {
        self.set_active(true)
    }

    /// Drag left the target. Returns whether the flag changed.
    pub fn drag_leave(&mut self) -> bool {
        self.set_active(false)
    }

    /// Ends the drag and picks the single item to ingest: the first one.
    pub fn drop_items<T>(&mut self, items: impl IntoIterator<Item = T>) -> Option<T> {
        self.active = false;
        items.into_iter().next()
    }

    fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }
}
