use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::assets::LoadedImage;
use crate::assets::decode::decode_image;
use crate::foundation::error::{PosterError, PosterResult};

/// Anything that can turn an image reference into a bitmap.
pub trait ImageSource {
    fn load(&mut self, reference: &str) -> PosterResult<Arc<LoadedImage>>;
}

/// Bytes returned by a remote fetch.
#[derive(Clone, Debug)]
pub struct RemoteImage {
    pub bytes: Vec<u8>,
    /// Whether the origin allows reading the pixels back (CORS). Images without it can be drawn
    /// but taint the surface.
    pub cross_origin_readable: bool,
}

/// Network collaborator for `http(s)://` references.
pub trait RemoteFetch {
    fn fetch(&self, url: &str) -> PosterResult<RemoteImage>;
}

/// Decoded images kept alive between passes: cover, uncompressed cover, template and one spare.
pub const CACHE_CAPACITY: usize = 4;

/// Default [`ImageSource`]: `data:` URLs, local paths, `file://` URLs and, with a fetcher,
/// remote URLs. The most recently used [`CACHE_CAPACITY`] loads are cached by reference.
pub struct AssetLoader {
    root: PathBuf,
    fetch: Option<Box<dyn RemoteFetch>>,
    /// Least recently used first.
    cache: VecDeque<(String, Arc<LoadedImage>)>,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fetch: None,
            cache: VecDeque::with_capacity(CACHE_CAPACITY),
        }
    }

    pub fn with_fetch(mut self, fetch: Box<dyn RemoteFetch>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn resolve_path(&self, reference: &str) -> PathBuf {
        let p = Path::new(reference);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    fn load_uncached(&self, reference: &str) -> PosterResult<LoadedImage> {
        if let Some(rest) = reference.strip_prefix("data:") {
            let bytes = decode_data_url(rest)?;
            return Ok(LoadedImage::from_rgba(decode_image(&bytes)?));
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            let fetch = self.fetch.as_ref().ok_or_else(|| {
                PosterError::image_load(format!("no remote fetcher configured for '{reference}'"))
            })?;
            let remote = fetch.fetch(reference)?;
            let rgba = decode_image(&remote.bytes)?;
            return Ok(LoadedImage {
                rgba: Arc::new(rgba),
                readable: remote.cross_origin_readable,
            });
        }

        let local = reference.strip_prefix("file://").unwrap_or(reference);
        let path = self.resolve_path(local);
        let bytes = std::fs::read(&path).map_err(|e| {
            PosterError::image_load(format!("read image '{}': {e}", path.display()))
        })?;
        Ok(LoadedImage::from_rgba(decode_image(&bytes)?))
    }
}

impl ImageSource for AssetLoader {
    fn load(&mut self, reference: &str) -> PosterResult<Arc<LoadedImage>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(PosterError::image_load("empty image reference"));
        }
        if let Some(pos) = self.cache.iter().position(|(key, _)| key == reference) {
            if let Some(entry) = self.cache.remove(pos) {
                let img = Arc::clone(&entry.1);
                self.cache.push_back(entry);
                return Ok(img);
            }
        }
        let img = Arc::new(self.load_uncached(reference)?);
        tracing::debug!(
            reference = %abbreviate(reference),
            width = img.rgba.width(),
            height = img.rgba.height(),
            readable = img.readable,
            "loaded image"
        );
        if self.cache.len() >= CACHE_CAPACITY {
            self.cache.pop_front();
        }
        self.cache.push_back((reference.to_string(), Arc::clone(&img)));
        Ok(img)
    }
}

/// `<mime>;base64,<payload>` after the `data:` scheme.
fn decode_data_url(rest: &str) -> PosterResult<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PosterError::image_load("data URL has no payload"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(PosterError::image_load("only base64 data URLs are supported"));
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| PosterError::image_load(format!("invalid base64 data URL: {e}")))
}

/// Data URLs can be megabytes long; keep log lines short.
fn abbreviate(reference: &str) -> String {
    const MAX: usize = 64;
    if reference.len() <= MAX {
        return reference.to_string();
    }
    let cut = (0..=MAX)
        .rev()
        .find(|&i| reference.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}...", &reference[..cut])
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
