use std::fmt;

use crate::foundation::core::Rgba8;
use crate::layout::fit::TitleFit;

/// Fonts offered by the editor. `System` is a sentinel resolved to a platform font stack.
pub const AVAILABLE_FONTS: [&str; 12] = [
    "System",
    "Montserrat",
    "Inter",
    "Roboto",
    "Open Sans",
    "Lato",
    "Poppins",
    "Georgia",
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Playfair Display",
];

/// Font selector for one text region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontChoice {
    #[default]
    System,
    Named(String),
}

impl From<String> for FontChoice {
    fn from(s: String) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "System" {
            Self::System
        } else {
            Self::Named(trimmed.to_string())
        }
    }
}

impl From<&str> for FontChoice {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<FontChoice> for String {
    fn from(f: FontChoice) -> Self {
        match f {
            FontChoice::System => "System".to_string(),
            FontChoice::Named(name) => name,
        }
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("System"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Numeric fields of [`PosterContent`]. They are stored as text, exactly as typed in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericField {
    TitleSize,
    ArtistsSize,
    TracksSize,
    MarginTop,
    MarginSide,
    MarginCover,
    MarginBackground,
    FrameWidth,
    ColumnGap,
}

impl NumericField {
    pub const ALL: [Self; 9] = [
        Self::TitleSize,
        Self::ArtistsSize,
        Self::TracksSize,
        Self::MarginTop,
        Self::MarginSide,
        Self::MarginCover,
        Self::MarginBackground,
        Self::FrameWidth,
        Self::ColumnGap,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::TitleSize => "titleSize",
            Self::ArtistsSize => "artistsSize",
            Self::TracksSize => "tracksSize",
            Self::MarginTop => "marginTop",
            Self::MarginSide => "marginSide",
            Self::MarginCover => "marginCover",
            Self::MarginBackground => "marginBackground",
            Self::FrameWidth => "frameWidth",
            Self::ColumnGap => "columnGap",
        }
    }

    /// Value substituted when the stored text has no leading digits.
    pub fn fallback(self) -> u32 {
        match self {
            Self::TitleSize => 230,
            Self::ArtistsSize => 110,
            Self::TracksSize => 50,
            Self::MarginTop | Self::MarginSide | Self::MarginCover | Self::MarginBackground => 0,
            Self::FrameWidth => 24,
            Self::ColumnGap => 40,
        }
    }
}

/// Color fields of [`PosterContent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorField {
    Background,
    Text,
    Color1,
    Color2,
    Color3,
    Frame,
}

impl ColorField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Background => "backgroundColor",
            Self::Text => "textColor",
            Self::Color1 => "color1",
            Self::Color2 => "color2",
            Self::Color3 => "color3",
            Self::Frame => "frameColor",
        }
    }

    pub fn fallback(self) -> Rgba8 {
        match self {
            Self::Background => Rgba8::BLACK,
            Self::Text => Rgba8::WHITE,
            Self::Color1 => Rgba8::rgb(0xff, 0x00, 0x00),
            Self::Color2 => Rgba8::rgb(0x00, 0xff, 0x40),
            Self::Color3 => Rgba8::rgb(0x26, 0x00, 0xff),
            Self::Frame => Rgba8::WHITE,
        }
    }
}

/// Everything one poster shows. Rendering treats a value as an immutable snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosterContent {
    pub album_name: String,
    pub artists_name: String,
    /// Newline-delimited track lines.
    pub tracklist: String,
    #[serde(alias = "titleRelease")]
    pub release_label: String,
    pub release_date: String,
    #[serde(alias = "titleRuntime")]
    pub runtime_label: String,
    #[serde(alias = "runtimeValue")]
    pub runtime: String,

    pub title_size: String,
    pub artists_size: String,
    pub tracks_size: String,
    pub margin_top: String,
    pub margin_side: String,
    pub margin_cover: String,
    pub margin_background: String,
    pub frame_width: String,
    pub column_gap: String,

    pub background_color: String,
    pub text_color: String,
    pub color1: String,
    pub color2: String,
    pub color3: String,
    pub frame_color: String,

    pub use_fade: bool,
    pub show_tracklist: bool,
    pub framed: bool,
    pub show_track_numbers: bool,
    pub show_track_lengths: bool,

    pub title_font: FontChoice,
    pub artist_font: FontChoice,
    pub tracks_font: FontChoice,

    /// URL, path or `data:` URL of the compressed cover. Empty means no cover.
    pub album_cover: String,
    pub uncompressed_album_cover: Option<String>,
    pub use_uncompressed: bool,
    /// Full-bleed artwork drawn beneath the cover.
    pub template_image: Option<String>,

    /// Set once the title size has been auto-fitted and written back.
    #[serde(alias = "initialTitleSizeSet")]
    pub title_fit_committed: bool,
    #[serde(alias = "userAdjustedTitleSize")]
    pub title_size_user_adjusted: bool,
    /// Bumped by every helper that derives a new snapshot.
    pub revision: u64,
}

impl Default for PosterContent {
    fn default() -> Self {
        Self {
            album_name: String::new(),
            artists_name: String::new(),
            tracklist: String::new(),
            release_label: "RELEASE".to_string(),
            release_date: String::new(),
            runtime_label: "RUNTIME".to_string(),
            runtime: String::new(),
            title_size: "200".to_string(),
            artists_size: "110".to_string(),
            tracks_size: "50".to_string(),
            margin_top: "0".to_string(),
            margin_side: "160".to_string(),
            margin_cover: "0".to_string(),
            margin_background: "0".to_string(),
            frame_width: "24".to_string(),
            column_gap: "40".to_string(),
            background_color: "#5900ff".to_string(),
            text_color: "#ff9100".to_string(),
            color1: "#ff0000".to_string(),
            color2: "#00ff40".to_string(),
            color3: "#2600ff".to_string(),
            frame_color: "#ffffff".to_string(),
            use_fade: true,
            show_tracklist: false,
            framed: false,
            show_track_numbers: true,
            show_track_lengths: true,
            title_font: FontChoice::System,
            artist_font: FontChoice::System,
            tracks_font: FontChoice::System,
            album_cover: String::new(),
            uncompressed_album_cover: None,
            use_uncompressed: false,
            template_image: None,
            title_fit_committed: false,
            title_size_user_adjusted: false,
            revision: 0,
        }
    }
}

/// Leading run of ASCII digits after optional whitespace (`"12px"` -> 12).
pub(crate) fn parse_lenient_u32(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}

impl PosterContent {
    fn raw_numeric(&self, field: NumericField) -> &str {
        match field {
            NumericField::TitleSize => &self.title_size,
            NumericField::ArtistsSize => &self.artists_size,
            NumericField::TracksSize => &self.tracks_size,
            NumericField::MarginTop => &self.margin_top,
            NumericField::MarginSide => &self.margin_side,
            NumericField::MarginCover => &self.margin_cover,
            NumericField::MarginBackground => &self.margin_background,
            NumericField::FrameWidth => &self.frame_width,
            NumericField::ColumnGap => &self.column_gap,
        }
    }

    fn raw_color(&self, field: ColorField) -> &str {
        match field {
            ColorField::Background => &self.background_color,
            ColorField::Text => &self.text_color,
            ColorField::Color1 => &self.color1,
            ColorField::Color2 => &self.color2,
            ColorField::Color3 => &self.color3,
            ColorField::Frame => &self.frame_color,
        }
    }

    /// Parsed value of a numeric field, or its documented fallback.
    pub fn numeric(&self, field: NumericField) -> u32 {
        let raw = self.raw_numeric(field);
        match parse_lenient_u32(raw) {
            Some(v) => v,
            None => {
                tracing::debug!(
                    field = field.key(),
                    raw,
                    fallback = field.fallback(),
                    "numeric field unparseable, using fallback"
                );
                field.fallback()
            }
        }
    }

    /// Parsed value of a color field, or its documented fallback.
    pub fn color(&self, field: ColorField) -> Rgba8 {
        let raw = self.raw_color(field);
        Rgba8::from_hex(raw).unwrap_or_else(|_| {
            tracing::debug!(field = field.key(), raw, "color field invalid, using fallback");
            field.fallback()
        })
    }

    /// The cover reference that gets drawn, if any.
    pub fn active_cover(&self) -> Option<&str> {
        if self.use_uncompressed
            && let Some(uncompressed) = self.uncompressed_album_cover.as_deref()
            && !uncompressed.trim().is_empty()
        {
            return Some(uncompressed);
        }
        let cover = self.album_cover.trim();
        (!cover.is_empty()).then_some(cover)
    }

    pub fn template(&self) -> Option<&str> {
        self.template_image
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Whether the next render should auto-fit the title.
    pub fn needs_title_fit(&self) -> bool {
        !self.title_size_user_adjusted && !self.title_fit_committed
    }

    /// New snapshot carrying the fitted title size; later renders keep it.
    pub fn commit_title_fit(&self, fit: &TitleFit) -> Self {
        let mut next = self.clone();
        next.title_size = fit.base_size.to_string();
        next.title_fit_committed = true;
        next.revision = self.revision.wrapping_add(1);
        next
    }

    /// New snapshot with a manually chosen title size. Disables auto-fit.
    pub fn with_title_size(&self, size: u32) -> Self {
        let mut next = self.clone();
        next.title_size = size.to_string();
        next.title_size_user_adjusted = true;
        next.revision = self.revision.wrapping_add(1);
        next
    }

    /// New snapshot that fits the title again on the next render.
    pub fn clear_title_fit(&self) -> Self {
        let mut next = self.clone();
        next.title_fit_committed = false;
        next.title_size_user_adjusted = false;
        next.revision = self.revision.wrapping_add(1);
        next
    }

    /// New snapshot with a different cover. The uncompressed variant is kept for toggling.
    pub fn with_cover(&self, compressed: impl Into<String>, uncompressed: Option<String>) -> Self {
        let mut next = self.clone();
        next.album_cover = compressed.into();
        next.uncompressed_album_cover = uncompressed;
        next.revision = self.revision.wrapping_add(1);
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/model.rs"]
mod tests;
