//! Talking to the remote processing service.

mod client;
mod endpoints;
mod orchestrator;

pub use client::{HttpProcessingClient, ProcessingBackend, UploadReceipt, UploadRequest};
pub use endpoints::Endpoints;
pub use orchestrator::{SubmissionOrchestrator, SubmissionOutcome};
