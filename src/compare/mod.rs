//! Side-by-side and slider comparison of the original and processed images.

mod export;
mod renderer;
mod view;

pub use export::{ExportRequest, save_export};
pub use renderer::{ComparisonRenderer, ProcessedPane, RenderPlan};
pub use view::{
    ComparisonView,
    ContainerBounds,
    INITIAL_SLIDER_PERCENT,
    PointerEvent,
    ViewMode,
    reveal_percent,
};
