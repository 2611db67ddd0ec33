//! Tauri command handlers for choosing, processing and exporting images.

use std::path::PathBuf;
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, warn};

use crate::core::{AppState, FilterChoice, ProcessingState, SelectionInfo};
use crate::ingest::IngestSource;
use crate::processing::SubmissionOutcome;
use crate::utils::{SourceFormat, StudioError, StudioResult};

/// Opens the native file picker and ingests the chosen image.
///
/// Returns `None` when the dialog is dismissed.
#[tauri::command]
pub async fn pick_image(app: AppHandle, state: State<'_, AppState>) -> StudioResult<Option<SelectionInfo>> {
    let picked = app
        .dialog()
        .file()
        .add_filter("Images", &SourceFormat::all_extensions())
        .blocking_pick_file();

    let Some(picked) = picked else {
        debug!("Browse dialog dismissed");
        return Ok(None);
    };
    let path = picked
        .into_path()
        .map_err(|e| StudioError::io(format!("Unusable selection: {e}")))?;

    state.ingest_path(path, IngestSource::Browse).await.map(Some)
}

/// Ingests a file the frontend already knows the path of.
#[tauri::command]
pub async fn ingest_file(
    state: State<'_, AppState>,
    path: PathBuf,
    source: IngestSource,
) -> StudioResult<SelectionInfo> {
    state.ingest_path(path, source).await
}

/// Applies `filter` to the current selection and returns the resulting state.
///
/// A superseded submission reports the state that replaced it.
#[tauri::command]
pub async fn submit_filter(state: State<'_, AppState>, filter: FilterChoice) -> StudioResult<ProcessingState> {
    match state.submit(filter).await? {
        SubmissionOutcome::Applied(processing) => Ok(processing),
        SubmissionOutcome::Superseded { ticket } => {
            debug!("Submission {} superseded", ticket);
            Ok(state.session().processing_state())
        }
    }
}

/// Asks where to save the processed image and downloads it there.
///
/// Returns the saved path, or `None` when the dialog is dismissed.
#[tauri::command]
pub async fn export_processed(app: AppHandle, state: State<'_, AppState>) -> StudioResult<Option<PathBuf>> {
    let request = state.export_request()?;

    let picked = app
        .dialog()
        .file()
        .set_file_name(&request.file_name)
        .blocking_save_file();
    let Some(picked) = picked else {
        debug!("Save dialog dismissed");
        return Ok(None);
    };
    let dest = picked
        .into_path()
        .map_err(|e| StudioError::io(format!("Unusable destination: {e}")))?;

    state.export_to(&dest).await?;

    if let Err(e) = app.opener().reveal_item_in_dir(&dest) {
        warn!("Could not reveal {}: {}", dest.display(), e);
    }
    Ok(Some(dest))
}

#[tauri::command]
pub async fn check_server(state: State<'_, AppState>) -> StudioResult<bool> {
    Ok(state.check_server().await)
}
