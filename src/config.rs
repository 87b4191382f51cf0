use std::ffi::OsString;
use std::path::PathBuf;

use crate::render::backend::BackendPreference;

pub const FONT_DIRS_ENV: &str = "PLASTERED_FONT_DIRS";
pub const ASSETS_ROOT_ENV: &str = "PLASTERED_ASSETS_ROOT";
pub const BACKEND_ENV: &str = "PLASTERED_BACKEND";

/// Settings for a [`crate::render::PosterRenderer`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Extra directories whose font files are registered next to the system fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Base for relative image paths and `file://` URLs.
    pub assets_root: PathBuf,
    pub backend: BackendPreference,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            font_dirs: Vec::new(),
            assets_root: PathBuf::from("."),
            backend: BackendPreference::Auto,
        }
    }
}

impl RendererOpts {
    /// Defaults overridden by `PLASTERED_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut opts = Self::default();

        if let Some(dirs) = lookup(FONT_DIRS_ENV) {
            opts.font_dirs = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }

        if let Some(root) = lookup(ASSETS_ROOT_ENV).filter(|r| !r.is_empty()) {
            opts.assets_root = PathBuf::from(root);
        }

        if let Some(raw) = lookup(BACKEND_ENV) {
            match raw.to_string_lossy().parse::<BackendPreference>() {
                Ok(pref) => opts.backend = pref,
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring {BACKEND_ENV}, using auto");
                }
            }
        }

        opts
    }

    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
