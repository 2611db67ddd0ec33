pub mod config;
pub mod error;
pub mod formats;
pub mod fs;
pub mod validation;

pub use config::ClientConfig;
pub use error::{
    OFFLINE_MESSAGE,
    RenderError,
    StudioError,
    StudioResult,
    SubmitFailure,
    ValidationError,
};
pub use formats::{MAX_FILE_SIZE, SourceFormat, format_from_name};
pub use fs::{candidate_from_path, extract_filename, read_candidate};
pub use validation::{validate, validate_size, validate_with_limit};
