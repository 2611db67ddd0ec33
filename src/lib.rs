// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod ingest;
pub mod processing;
pub mod compare;
pub mod logging;
#[cfg(feature = "desktop")]
pub mod commands;

// Public exports for external consumers
pub use core::{AppState, FilterChoice, ProcessingState, SessionEvent, SessionSnapshot};
pub use compare::{ComparisonRenderer, RenderPlan, ViewMode};
pub use ingest::IngestSource;
pub use processing::{HttpProcessingClient, ProcessingBackend, SubmissionOrchestrator};
pub use utils::{ClientConfig, StudioError, StudioResult};
