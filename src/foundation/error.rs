pub type PosterResult<T> = Result<T, PosterError>;

#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("image load error: {0}")]
    ImageLoad(String),

    /// The surface can no longer be read back because an unreadable image was drawn onto it.
    #[error("surface tainted: {0}")]
    SurfaceTainted(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    pub fn tainted(msg: impl Into<String>) -> Self {
        Self::SurfaceTainted(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the caller can reasonably retry with different inputs (another cover source,
    /// a smaller export size) and expect success.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad(_) | Self::SurfaceTainted(_) | Self::Encoding(_) | Self::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
