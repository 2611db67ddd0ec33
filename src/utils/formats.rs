use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::utils::ValidationError;

/// Upload size limit enforced before anything is read or sent (15 MiB).
pub const MAX_FILE_SIZE: u64 = 15 * 1024 * 1024;

/// Image formats the processing endpoint accepts from this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    PNG,
    JPEG,
    BMP,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 3] = [Self::PNG, Self::JPEG, Self::BMP];

    /// Every accepted extension, lowercase, e.g. for a file dialog filter.
    pub fn all_extensions() -> Vec<&'static str> {
        Self::ALL.iter().flat_map(|format| format.extensions().iter().copied()).collect()
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::PNG => &["png"],
            Self::JPEG => &["jpg", "jpeg"],
            Self::BMP => &["bmp"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    /// MIME type sent with the multipart file field
    pub fn mime(&self) -> &'static str {
        match self {
            Self::PNG => "image/png",
            Self::JPEG => "image/jpeg",
            Self::BMP => "image/bmp",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = ValidationError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "png" => Ok(Self::PNG),
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "bmp" => Ok(Self::BMP),
            _ => Err(ValidationError::unsupported(ext)),
        }
    }
}

/// Get format from a display file name.
///
/// The extension is whatever follows the last `.`; a name without one is unsupported.
pub fn format_from_name(name: &str) -> Result<SourceFormat, ValidationError> {
    let (_, ext) = name
        .rsplit_once('.')
        .ok_or_else(|| ValidationError::unsupported(name))?;

    SourceFormat::from_str(ext).map_err(|_| ValidationError::unsupported(name))
}
