use tauri::State;

use crate::compare::{ComparisonView, ContainerBounds, PointerEvent, ViewMode};
use crate::core::{AppState, FilterInfo, SessionSnapshot, catalog};
use crate::utils::StudioResult;

#[tauri::command]
pub fn list_filters() -> Vec<FilterInfo> {
    catalog()
}

#[tauri::command]
pub fn session_snapshot(state: State<'_, AppState>) -> SessionSnapshot {
    state.snapshot()
}

#[tauri::command]
pub fn set_view_mode(state: State<'_, AppState>, mode: ViewMode) -> StudioResult<ComparisonView> {
    state.set_view_mode(mode)
}

/// Slider input; called for every pointer or touch event over the container.
#[tauri::command]
pub fn slider_pointer(state: State<'_, AppState>, event: PointerEvent, bounds: ContainerBounds) -> ComparisonView {
    state.pointer(event, bounds)
}
