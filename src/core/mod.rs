//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`AppState`]: Application state shared with the desktop shell
//! - [`Session`]: The current selection and processing state
//! - [`FilterChoice`]: The catalog of remote filters
//! - [`Selection`] / [`Preview`]: A validated source image and its local preview

mod filters;
mod preview;
mod selection;
mod session;
mod state;

pub use filters::{FilterChoice, FilterInfo, catalog};
pub use preview::{PREVIEW_SCHEME, Preview, PreviewEntry, PreviewStore};
pub use selection::{Candidate, CandidateSource, Selection, SelectionInfo, SelectionMeta};
pub use session::{
    FailureKind,
    ProcessedResult,
    ProcessingState,
    Session,
    SessionEvent,
    SubmissionTicket,
};
pub use state::{AppState, SessionSnapshot};
