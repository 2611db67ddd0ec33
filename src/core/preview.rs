//! Local preview handles for the current selection.
//!
//! A [`Preview`] is the desktop counterpart of a browser object URL: a short-lived
//! `preview://` address backed by bytes held in the [`PreviewStore`]. The handle
//! releases its entry when dropped, so a preview lives exactly as long as the
//! selection that owns it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use bytes::Bytes;
use tracing::debug;

/// URI scheme the desktop shell registers for previews.
pub const PREVIEW_SCHEME: &str = "preview";

#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub data: Bytes,
    pub mime: &'static str,
}

/// Registry of live preview entries.
#[derive(Debug, Default)]
pub struct PreviewStore {
    entries: Mutex<HashMap<u64, PreviewEntry>>,
    next_id: AtomicU64,
    released: AtomicU64,
}

impl PreviewStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers `data` and returns the owning handle.
    pub fn create(self: &Arc<Self>, data: Bytes, mime: &'static str) -> Preview {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, PreviewEntry { data, mime });
        debug!("Preview {} created", id);

        Preview {
            id,
            store: Arc::clone(self),
        }
    }

    /// Looks up a live entry by id.
    pub fn get(&self, id: u64) -> Option<PreviewEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Resolves a `preview://localhost/<id>` style path (scheme and host optional).
    pub fn resolve(&self, url: &str) -> Option<PreviewEntry> {
        let id = url.trim_end_matches('/').rsplit('/').next()?.parse().ok()?;
        self.get(id)
    }

    pub fn live_count(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Total number of entries released since the store was created.
    pub fn released_count(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    fn release(&self, id: u64) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        if removed.is_some() {
            self.released.fetch_add(1, Ordering::Relaxed);
            debug!("Preview {} released", id);
        }
    }
}

/// Owning handle to one preview entry.
#[derive(Debug)]
pub struct Preview {
    id: u64,
    store: Arc<PreviewStore>,
}

impl Preview {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> String {
        format!("{PREVIEW_SCHEME}://localhost/{}", self.id)
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.store.release(self.id);
    }
}
