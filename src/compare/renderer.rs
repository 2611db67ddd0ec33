//! Decides what the comparison area shows for a given session state.
//!
//! The renderer only reads [`ProcessingState`]; it never changes the selection or
//! the submission lifecycle.

use serde::Serialize;
use tracing::debug;

use crate::compare::export::ExportRequest;
use crate::compare::view::{ComparisonView, ContainerBounds, PointerEvent, ViewMode, reveal_percent};
use crate::core::{ProcessingState, SelectionInfo};
use crate::processing::Endpoints;
use crate::utils::RenderError;

/// The processed half of the side-by-side layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ProcessedPane {
    /// Nothing submitted yet, or the last attempt failed
    Awaiting,
    Loading,
    Ready { url: String, label: String },
}

/// What the shell must draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "camelCase")]
pub enum RenderPlan {
    Placeholder,
    #[serde(rename_all = "camelCase")]
    SideBySide {
        original: String,
        processed: ProcessedPane,
        /// Mode toggle and download are offered
        controls: bool,
    },
    #[serde(rename_all = "camelCase")]
    Slider {
        original: String,
        processed: String,
        label: String,
        percent: f64,
    },
}

#[derive(Debug, Default)]
pub struct ComparisonRenderer {
    view: ComparisonView,
    comparing: bool,
}

impl ComparisonRenderer {
    pub fn view(&self) -> ComparisonView {
        self.view
    }

    pub fn is_comparing(&self) -> bool {
        self.comparing
    }

    /// Switches the view mode. Returns whether anything changed.
    pub fn set_mode(&mut self, state: &ProcessingState, mode: ViewMode) -> Result<bool, RenderError> {
        if state.succeeded().is_none() {
            return Err(RenderError::NotReady);
        }
        if self.view.mode == mode {
            return Ok(false);
        }

        debug!("Comparison mode {:?} -> {:?}", self.view.mode, mode);
        self.view.mode = mode;
        self.comparing = false;
        Ok(true)
    }

    /// Feeds slider input. Returns whether the reveal percentage moved.
    ///
    /// Ignored unless the slider is showing a succeeded result.
    pub fn handle_pointer(&mut self, event: PointerEvent, bounds: ContainerBounds, state: &ProcessingState) -> bool {
        if self.view.mode != ViewMode::Slider || state.succeeded().is_none() {
            return false;
        }

        if event.starts_drag() {
            self.comparing = true;
            return false;
        }
        if event.ends_drag() {
            self.comparing = false;
            return false;
        }

        let Some(x) = event.position().filter(|_| self.comparing) else {
            return false;
        };
        match reveal_percent(x, bounds) {
            Some(percent) if percent != self.view.slider_percent => {
                self.view.slider_percent = percent;
                true
            }
            _ => false,
        }
    }

    pub fn plan(&self, selection: Option<&SelectionInfo>, state: &ProcessingState, endpoints: &Endpoints) -> RenderPlan {
        let Some(selection) = selection else {
            return RenderPlan::Placeholder;
        };

        match state {
            ProcessingState::Succeeded(result) => {
                let original = endpoints.uploaded_for(result).to_string();
                let processed = endpoints.processed_for(result).to_string();
                let label = result.filter.label();

                if self.view.mode == ViewMode::Slider {
                    RenderPlan::Slider {
                        original,
                        processed,
                        label,
                        percent: self.view.slider_percent,
                    }
                } else {
                    RenderPlan::SideBySide {
                        original,
                        processed: ProcessedPane::Ready { url: processed, label },
                        controls: true,
                    }
                }
            }
            ProcessingState::InFlight { .. } => RenderPlan::SideBySide {
                original: selection.preview_url.clone(),
                processed: ProcessedPane::Loading,
                controls: false,
            },
            ProcessingState::Idle | ProcessingState::Failed { .. } => RenderPlan::SideBySide {
                original: selection.preview_url.clone(),
                processed: ProcessedPane::Awaiting,
                controls: false,
            },
        }
    }

    /// Describes the download of the current result. Never starts processing.
    pub fn export(&self, state: &ProcessingState, endpoints: &Endpoints) -> Result<ExportRequest, RenderError> {
        let result = state.succeeded().ok_or(RenderError::NotReady)?;
        Ok(ExportRequest {
            source: endpoints.processed_for(result).to_string(),
            file_name: result.download_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use crate::core::{FilterChoice, ProcessedResult};

    const BOUNDS: ContainerBounds = ContainerBounds { left: 0.0, width: 200.0 };

    fn endpoints() -> Endpoints {
        Endpoints::new(Url::parse("http://localhost:5000").unwrap())
    }

    fn selection() -> SelectionInfo {
        SelectionInfo {
            name: "cat.png".into(),
            size: 3,
            mime: "image/png".into(),
            preview_url: "preview://localhost/1".into(),
        }
    }

    fn succeeded() -> ProcessingState {
        ProcessingState::Succeeded(ProcessedResult::new("cat.png", FilterChoice::Blur))
    }

    #[test]
    fn mode_changes_need_a_result() {
        let mut renderer = ComparisonRenderer::default();
        assert_eq!(renderer.set_mode(&ProcessingState::Idle, ViewMode::Slider), Err(RenderError::NotReady));
        assert_eq!(renderer.view().mode, ViewMode::SideBySide);

        assert_eq!(renderer.set_mode(&succeeded(), ViewMode::Slider), Ok(true));
        assert_eq!(renderer.set_mode(&succeeded(), ViewMode::Slider), Ok(false));
        assert_eq!(renderer.view().mode, ViewMode::Slider);
    }

    #[test]
    fn dragging_moves_the_divider() {
        let state = succeeded();
        let mut renderer = ComparisonRenderer::default();
        renderer.set_mode(&state, ViewMode::Slider).unwrap();
        assert_eq!(renderer.view().slider_percent, 50.0);

        // Moves before a drag starts do nothing
        assert!(!renderer.handle_pointer(PointerEvent::MouseMove { x: 20.0 }, BOUNDS, &state));

        renderer.handle_pointer(PointerEvent::MouseDown, BOUNDS, &state);
        assert!(renderer.is_comparing());
        assert!(renderer.handle_pointer(PointerEvent::MouseMove { x: 50.0 }, BOUNDS, &state));
        assert_eq!(renderer.view().slider_percent, 25.0);

        renderer.handle_pointer(PointerEvent::MouseLeave, BOUNDS, &state);
        assert!(!renderer.is_comparing());
        assert!(!renderer.handle_pointer(PointerEvent::MouseMove { x: 150.0 }, BOUNDS, &state));
        assert_eq!(renderer.view().slider_percent, 25.0);

        renderer.handle_pointer(PointerEvent::TouchStart, BOUNDS, &state);
        renderer.handle_pointer(PointerEvent::TouchMove { x: 260.0 }, BOUNDS, &state);
        renderer.handle_pointer(PointerEvent::TouchEnd, BOUNDS, &state);
        assert_eq!(renderer.view().slider_percent, 100.0);
    }

    #[test]
    fn collapsed_container_keeps_the_divider() {
        let state = succeeded();
        let mut renderer = ComparisonRenderer::default();
        renderer.set_mode(&state, ViewMode::Slider).unwrap();
        renderer.handle_pointer(PointerEvent::MouseDown, BOUNDS, &state);

        let collapsed = ContainerBounds { left: 0.0, width: 0.0 };
        assert!(!renderer.handle_pointer(PointerEvent::MouseMove { x: 10.0 }, collapsed, &state));
        assert_eq!(renderer.view().slider_percent, 50.0);
    }

    #[test]
    fn plans_follow_the_processing_state() {
        let mut renderer = ComparisonRenderer::default();
        let endpoints = endpoints();
        let info = selection();

        assert_eq!(renderer.plan(None, &ProcessingState::Idle, &endpoints), RenderPlan::Placeholder);

        let in_flight = ProcessingState::InFlight { filter: FilterChoice::Blur };
        assert_eq!(
            renderer.plan(Some(&info), &in_flight, &endpoints),
            RenderPlan::SideBySide {
                original: "preview://localhost/1".into(),
                processed: ProcessedPane::Loading,
                controls: false,
            }
        );

        let state = succeeded();
        assert_eq!(
            renderer.plan(Some(&info), &state, &endpoints),
            RenderPlan::SideBySide {
                original: "http://localhost:5000/uploads/cat.png".into(),
                processed: ProcessedPane::Ready {
                    url: "http://localhost:5000/processed/blur_cat.png".into(),
                    label: "Blur".into(),
                },
                controls: true,
            }
        );

        renderer.set_mode(&state, ViewMode::Slider).unwrap();
        assert!(matches!(
            renderer.plan(Some(&info), &state, &endpoints),
            RenderPlan::Slider { percent, .. } if percent == 50.0
        ));

        // Slider mode persists but falls back while no result is shown
        assert!(matches!(
            renderer.plan(Some(&info), &ProcessingState::Idle, &endpoints),
            RenderPlan::SideBySide { processed: ProcessedPane::Awaiting, .. }
        ));
    }

    #[test]
    fn export_uses_the_published_artifact() {
        let renderer = ComparisonRenderer::default();
        let endpoints = endpoints();

        assert_eq!(renderer.export(&ProcessingState::Idle, &endpoints), Err(RenderError::NotReady));

        let request = renderer.export(&succeeded(), &endpoints).unwrap();
        assert_eq!(request.file_name, "blur_processed_cat.png");
        assert_eq!(request.source, "http://localhost:5000/processed/blur_cat.png");
    }
}
