//! Error types for the filter studio.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! Submission failures live outside [`StudioError`]: they end up in the terminal
//! `Failed` processing state rather than in an `Err`.

use std::io;
use thiserror::Error;
use serde::Serialize;

use crate::utils::formats::MAX_FILE_SIZE;

/// Generic message shown for every transport-level failure.
pub const OFFLINE_MESSAGE: &str = "Failed to process the image. Server might be offline.";

/// Local validation errors. None of these ever reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    /// Candidate exceeds the upload size limit
    #[error("File is too large. Please select an image under {}.", size_label(*.limit))]
    FileTooLarge { size: u64, limit: u64 },
    /// Extension outside the supported set
    #[error("Unsupported file type. Please use PNG, JPG, JPEG, or BMP.")]
    UnsupportedType { name: String },
    /// Submission attempted without a selection
    #[error("Please select an image first!")]
    NoFileSelected,
}

/// Renderer errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RenderError {
    /// The operation needs a succeeded submission
    #[error("No processed image is available yet")]
    NotReady,
}

/// Why a submission ended in the `Failed` state.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmitFailure {
    /// Handled failure reported by the processing endpoint, kept verbatim
    #[error("{message}")]
    Server { message: String },
    /// Unreachable endpoint, timeout, non-2xx status or malformed body
    #[error("Failed to process the image. Server might be offline.")]
    Transport { detail: String },
}

/// Main error type for the studio.
///
/// All errors in the application are converted to this type before being
/// returned to the frontend.
#[derive(Error, Debug, Serialize)]
pub enum StudioError {
    /// Candidate or submission precondition failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Renderer operation not available in the current state
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request outside the submission lifecycle (health, export fetch)
    #[error("HTTP error: {0}")]
    Http(String),

    /// A newer browse or drop replaced this ingestion before it finished
    #[error("Selection of {0} was superseded by a newer one")]
    Superseded(String),
}

/// Renders a byte limit the way the UI copy states it: `15MB`, `512KB`, `100 bytes`.
fn size_label(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    match bytes {
        b if b >= MIB && b % MIB == 0 => format!("{}MB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{b} bytes"),
    }
}

/// Convenience result type for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

impl ValidationError {
    pub fn too_large(size: u64) -> Self {
        Self::too_large_for(size, MAX_FILE_SIZE)
    }

    pub fn too_large_for(size: u64, limit: u64) -> Self {
        Self::FileTooLarge { size, limit }
    }

    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedType { name: name.into() }
    }
}

impl SubmitFailure {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server { message: message.into() }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport { detail: detail.into() }
    }
}

impl StudioError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn http<T: Into<String>>(msg: T) -> Self {
        Self::Http(msg.into())
    }
}

// Convert std::io::Error to StudioError
impl From<io::Error> for StudioError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
