//! Candidate files and validated selections.

use std::path::PathBuf;
use bytes::Bytes;
use serde::Serialize;
use crate::utils::SourceFormat;

/// Where a candidate's bytes come from.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// On disk; read only after validation passes
    Path(PathBuf),
    /// Already in memory (e.g. handed over by the webview)
    Memory(Bytes),
}

/// A file-like object offered by a browse or drop gesture, not yet validated.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Display name, including extension
    pub name: String,
    /// Size in bytes as reported by the source
    pub size: u64,
    /// MIME type reported by the source, if any
    pub mime: Option<String>,
    pub source: CandidateSource,
}

impl Candidate {
    /// Creates an in-memory candidate whose size is the buffer length.
    pub fn from_bytes(name: impl Into<String>, mime: Option<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime,
            source: CandidateSource::Memory(data),
        }
    }
}

/// The part of a candidate that survived validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMeta {
    pub name: String,
    pub size: u64,
    pub format: SourceFormat,
}

/// The currently chosen source image.
///
/// Replaced wholesale on the next successful ingestion, never mutated. Cloning is
/// cheap: the contents are reference counted.
#[derive(Debug, Clone)]
pub struct Selection {
    name: String,
    size: u64,
    format: SourceFormat,
    data: Bytes,
}

impl Selection {
    pub(crate) fn new(meta: SelectionMeta, data: Bytes) -> Self {
        Self {
            name: meta.name,
            size: data.len() as u64,
            format: meta.format,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Frontend view of the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub preview_url: String,
}
