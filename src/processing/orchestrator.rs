use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{FilterChoice, ProcessedResult, ProcessingState, Session, SubmissionTicket};
use crate::processing::client::{ProcessingBackend, UploadReceipt, UploadRequest};
use crate::utils::{SubmitFailure, ValidationError};

/// How a submission ended from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The result became the session's processing state
    Applied(ProcessingState),
    /// A newer submission or selection change won; the result was dropped
    Superseded { ticket: u64 },
}

/// Sends the current selection to the processing backend, one ticket per submission.
pub struct SubmissionOrchestrator {
    session: Arc<Session>,
    backend: Arc<dyn ProcessingBackend>,
}

/// Resolves the ticket as a transport failure if the submission future is dropped
/// before the backend answers.
struct PendingSubmission<'a> {
    session: &'a Session,
    ticket: &'a SubmissionTicket,
    armed: bool,
}

impl PendingSubmission<'_> {
    fn finish(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Submission {} abandoned before completion", self.ticket.seq);
            self.session
                .resolve(self.ticket, SubmitFailure::transport("submission abandoned").into());
        }
    }
}

impl SubmissionOrchestrator {
    pub fn new(session: Arc<Session>, backend: Arc<dyn ProcessingBackend>) -> Self {
        Self { session, backend }
    }

    /// Applies `filter` to the current selection.
    ///
    /// Fails only when nothing is selected, in which case no request is sent.
    /// Every other outcome, including transport errors, lands in the session's
    /// processing state.
    pub async fn submit(&self, filter: FilterChoice) -> Result<SubmissionOutcome, ValidationError> {
        let ticket = self.session.begin_submission(filter)?;
        info!(
            "Submission {}: applying {} to {}",
            ticket.seq,
            filter,
            ticket.selection.name()
        );

        let request = UploadRequest::from(&ticket);
        let pending = PendingSubmission {
            session: &self.session,
            ticket: &ticket,
            armed: true,
        };

        let reply = self.backend.upload(request).await;
        pending.finish();

        let state = match reply {
            Ok(receipt) => ProcessingState::Succeeded(Self::result_for(&ticket, receipt)),
            Err(failure) => {
                if let SubmitFailure::Transport { detail } = &failure {
                    warn!("Submission {} failed in transport: {}", ticket.seq, detail);
                } else {
                    warn!("Submission {} rejected by server: {}", ticket.seq, failure);
                }
                failure.into()
            }
        };

        if self.session.resolve(&ticket, state.clone()) {
            Ok(SubmissionOutcome::Applied(state))
        } else {
            Ok(SubmissionOutcome::Superseded { ticket: ticket.seq })
        }
    }

    fn result_for(ticket: &SubmissionTicket, receipt: UploadReceipt) -> ProcessedResult {
        if let Some(stored) = receipt
            .original_filename
            .as_deref()
            .filter(|stored| *stored != ticket.selection.name())
        {
            debug!("Server stored {} as {}", ticket.selection.name(), stored);
        }

        let mut result = ProcessedResult::new(ticket.selection.name(), ticket.filter);
        result.uploaded_path = receipt.uploaded_image;
        result.processed_path = receipt.processed_image;
        result
    }
}
