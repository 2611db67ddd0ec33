use crate::core::{Candidate, SelectionMeta};
use crate::utils::{MAX_FILE_SIZE, ValidationError, format_from_name};

/// Validates a candidate against the default upload limit.
pub fn validate(candidate: &Candidate) -> Result<SelectionMeta, ValidationError> {
    validate_with_limit(candidate, MAX_FILE_SIZE)
}

/// Validates a candidate: size first, then extension.
///
/// Every ingestion path goes through here, so browse and drop enforce the same rules.
pub fn validate_with_limit(candidate: &Candidate, limit: u64) -> Result<SelectionMeta, ValidationError> {
    validate_size(candidate.size, limit)?;
    let format = format_from_name(&candidate.name)?;

    if let Some(mime) = candidate.mime.as_deref() {
        if !mime.is_empty() && !mime.eq_ignore_ascii_case(format.mime()) {
            tracing::debug!(
                "{} reports MIME {} but its extension says {}",
                candidate.name, mime, format.mime()
            );
        }
    }

    Ok(SelectionMeta {
        name: candidate.name.clone(),
        size: candidate.size,
        format,
    })
}

/// Rejects sizes above `limit`. A size equal to the limit is accepted.
pub fn validate_size(size: u64, limit: u64) -> Result<(), ValidationError> {
    if size > limit {
        return Err(ValidationError::too_large_for(size, limit));
    }
    Ok(())
}
