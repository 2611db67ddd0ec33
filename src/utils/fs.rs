use std::path::Path;
use bytes::Bytes;
use tokio::fs;
use crate::core::{Candidate, CandidateSource};
use crate::utils::{StudioError, StudioResult};

/// Builds a candidate from a file on disk without reading its contents.
///
/// The size comes from metadata so oversized files can be rejected unread.
pub async fn candidate_from_path(path: impl AsRef<Path>) -> StudioResult<Candidate> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| StudioError::io(format!("Cannot read {}: {}", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(StudioError::io(format!("Not a file: {}", path.display())));
    }

    Ok(Candidate {
        name: extract_filename(path).to_string(),
        size: metadata.len(),
        mime: None,
        source: CandidateSource::Path(path.to_path_buf()),
    })
}

/// Loads the candidate's bytes.
pub async fn read_candidate(candidate: &Candidate) -> StudioResult<Bytes> {
    match &candidate.source {
        CandidateSource::Memory(data) => Ok(data.clone()),
        CandidateSource::Path(path) => fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| StudioError::io(format!("Failed to read {}: {}", path.display(), e))),
    }
}

/// File name component of `path`, or the whole path when it has none.
pub fn extract_filename(path: &Path) -> std::borrow::Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}
