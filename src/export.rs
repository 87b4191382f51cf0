pub mod governor;
pub mod naming;

use std::fmt;
use std::str::FromStr;

pub use governor::{ExportDecision, PIXEL_CEILING, PendingExport, SAFE_WIDTH, govern};
pub use naming::export_file_name;

use crate::foundation::core::ExportSize;
use crate::foundation::error::PosterError;

/// Export resolutions offered next to a custom size. All share the base canvas aspect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportPreset {
    ExtraSmall,
    Small,
    Medium,
    Large,
}

impl ExportPreset {
    pub const ALL: [Self; 4] = [Self::ExtraSmall, Self::Small, Self::Medium, Self::Large];

    pub fn size(self) -> ExportSize {
        let (width, height) = match self {
            Self::ExtraSmall => (2870, 4100),
            Self::Small => (4100, 5840),
            Self::Medium => (5840, 8310),
            Self::Large => (8310, 11790),
        };
        ExportSize { width, height }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ExtraSmall => "Extra small",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl fmt::Display for ExportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExtraSmall => "extra-small",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        })
    }
}

impl FromStr for ExportPreset {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "extra-small" | "xs" => Ok(Self::ExtraSmall),
            "small" | "s" => Ok(Self::Small),
            "medium" | "m" => Ok(Self::Medium),
            "large" | "l" => Ok(Self::Large),
            _ => Err(PosterError::validation(format!(
                "unknown preset '{s}' (expected extra-small, small, medium or large)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
