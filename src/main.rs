// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Desktop entry point for Filter Studio. The lib crate holds everything that
// does not need a webview.

use anyhow::Context;
use tauri::http::{Response, StatusCode, header::CONTENT_TYPE};
use tauri::{AppHandle, DragDropEvent, Emitter, Manager, WindowEvent};
use tauri_plugin_store::StoreExt;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use filter_studio_lib::commands::{
    check_server,
    export_processed,
    ingest_file,
    list_filters,
    pick_image,
    session_snapshot,
    set_view_mode,
    slider_pointer,
    submit_filter,
};
use filter_studio_lib::core::PREVIEW_SCHEME;
use filter_studio_lib::logging::init_tracing;
use filter_studio_lib::utils::StudioError;
use filter_studio_lib::{AppState, ClientConfig};

const SETTINGS_STORE: &str = "settings.json";
const SETTINGS_KEY: &str = "client";
const SESSION_EVENT: &str = "session-event";

fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("=== Application Starting ===");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_store::Builder::new().build())
        .register_uri_scheme_protocol(PREVIEW_SCHEME, |ctx, request| {
            preview_response(ctx.app_handle(), &request.uri().to_string())
        })
        .invoke_handler(tauri::generate_handler![
            list_filters,
            pick_image,
            ingest_file,
            submit_filter,
            session_snapshot,
            set_view_mode,
            slider_pointer,
            export_processed,
            check_server,
        ])
        .setup(|app| {
            let config = load_config(app.handle());
            info!("Processing endpoint: {}", config.endpoint);

            let state = AppState::new(config)?;
            let events = state.subscribe();
            app.manage(state);
            debug!("✓ AppState initialized");

            let app_handle = app.handle().clone();
            tauri::async_runtime::spawn(forward_events(app_handle, events));

            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::DragDrop(drag) = event {
                handle_drag_drop(window.app_handle(), drag);
            }
        })
        .build(tauri::generate_context!())
        .context("error while building tauri application")?;

    info!("Starting application event loop...");
    app.run(|app_handle, event| {
        if let tauri::RunEvent::Exit = event {
            if let Some(state) = app_handle.try_state::<AppState>() {
                state.teardown();
            }
            info!("Application exiting");
        }
    });

    Ok(())
}

/// Defaults, then the persisted `client` settings, then the environment.
fn load_config(app: &AppHandle) -> ClientConfig {
    let stored = match app.store(SETTINGS_STORE) {
        Ok(store) => store.get(SETTINGS_KEY),
        Err(e) => {
            warn!("Settings store unavailable: {}", e);
            None
        }
    };

    let config = match stored.map(serde_json::from_value::<ClientConfig>) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            warn!("Ignoring invalid stored settings: {}", e);
            ClientConfig::default()
        }
        None => ClientConfig::default(),
    };

    config.overlay_env(|key| std::env::var(key).ok())
}

async fn forward_events(app: AppHandle, mut events: tokio::sync::broadcast::Receiver<filter_studio_lib::SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Err(e) = app.emit(SESSION_EVENT, &event) {
                    warn!("Failed to emit {}: {}", SESSION_EVENT, e);
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!("Dropped {} session events", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}

fn handle_drag_drop(app: &AppHandle, drag: &DragDropEvent) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };

    match drag {
        DragDropEvent::Enter { .. } | DragDropEvent::Over { .. } => state.drag_over(),
        DragDropEvent::Leave => state.drag_leave(),
        DragDropEvent::Drop { paths, .. } => {
            let app = app.clone();
            let paths = paths.clone();
            tauri::async_runtime::spawn(async move {
                let state = app.state::<AppState>();
                match state.drop_paths(paths).await {
                    Ok(_) => {}
                    Err(StudioError::Superseded(name)) => debug!("Dropped file {} was superseded", name),
                    Err(rejected) => {
                        warn!("Dropped file rejected: {}", rejected);
                        if let Err(e) = app.emit("ingest-error", &rejected) {
                            warn!("Failed to emit ingest-error: {}", e);
                        }
                    }
                }
            });
        }
        _ => {}
    }
}

fn preview_response(app: &AppHandle, uri: &str) -> Response<Vec<u8>> {
    let entry = app
        .try_state::<AppState>()
        .and_then(|state| state.session().previews().resolve(uri));

    let response = match entry {
        Some(entry) => Response::builder()
            .header(CONTENT_TYPE, entry.mime)
            .body(entry.data.to_vec()),
        None => {
            debug!("No live preview for {}", uri);
            Response::builder().status(StatusCode::NOT_FOUND).body(Vec::new())
        }
    };

    response.unwrap_or_else(|_| Response::new(Vec::new()))
}
