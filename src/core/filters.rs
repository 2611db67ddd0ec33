//! The fixed catalog of filters the processing service understands.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterChoice {
    Sharpen,
    Blur,
    EdgeX,
    Emboss,
    Outline,
    HighPass,
}

impl FilterChoice {
    /// Catalog order, as presented to the user.
    pub const ALL: [FilterChoice; 6] = [
        Self::Sharpen,
        Self::Blur,
        Self::EdgeX,
        Self::Emboss,
        Self::Outline,
        Self::HighPass,
    ];

    /// Wire identifier sent in the `filter` form field and used in artifact names.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Sharpen => "sharpen",
            Self::Blur => "blur",
            Self::EdgeX => "edge_x",
            Self::Emboss => "emboss",
            Self::Outline => "outline",
            Self::HighPass => "high_pass",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sharpen => "Enhance edge details and clarity",
            Self::Blur => "Smooth out noise and details",
            Self::EdgeX => "Detect horizontal edges and boundaries",
            Self::Emboss => "Create 3D relief effect",
            Self::Outline => "Extract image contours",
            Self::HighPass => "Highlight fine details and textures",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Sharpen => "✧",
            Self::Blur => "◎",
            Self::EdgeX => "⟷",
            Self::Emboss => "◢",
            Self::Outline => "◇",
            Self::HighPass => "◈",
        }
    }

    /// Human label: `edge_x` becomes `Edge X`.
    pub fn label(&self) -> String {
        self.id()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn info(&self) -> FilterInfo {
        FilterInfo {
            id: *self,
            label: self.label(),
            description: self.description(),
            icon: self.icon(),
        }
    }
}

impl fmt::Display for FilterChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.id() == s)
            .ok_or_else(|| format!("Unknown filter: {s}"))
    }
}

/// Catalog entry as shown in the filter picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterInfo {
    pub id: FilterChoice,
    pub label: String,
    pub description: &'static str,
    pub icon: &'static str,
}

/// The whole catalog in presentation order.
pub fn catalog() -> Vec<FilterInfo> {
    FilterChoice::ALL.iter().map(FilterChoice::info).collect()
}
