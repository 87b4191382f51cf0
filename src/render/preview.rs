use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Short-lived reference to the most recent rendered poster, for on-screen display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the PNG behind the current preview handle.
///
/// Only one handle is live at a time: installing a new preview revokes the previous one, and
/// dropping the store revokes everything.
#[derive(Debug, Default)]
pub struct PreviewStore {
    next_id: u64,
    live: HashMap<PreviewHandle, Arc<Vec<u8>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, png: Arc<Vec<u8>>) -> PreviewHandle {
        self.revoke_all();
        self.next_id += 1;
        let handle = PreviewHandle(format!("preview:{}", self.next_id));
        self.live.insert(handle.clone(), png);
        tracing::debug!(%handle, "preview installed");
        handle
    }

    pub fn resolve(&self, handle: &PreviewHandle) -> Option<Arc<Vec<u8>>> {
        self.live.get(handle).cloned()
    }

    /// Returns whether the handle was still live.
    pub fn revoke(&mut self, handle: &PreviewHandle) -> bool {
        let revoked = self.live.remove(handle).is_some();
        if revoked {
            tracing::debug!(%handle, "preview revoked");
        }
        revoked
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn revoke_all(&mut self) {
        for handle in self.live.keys() {
            tracing::debug!(%handle, "preview revoked");
        }
        self.live.clear();
    }
}

impl Drop for PreviewStore {
    fn drop(&mut self) {
        self.revoke_all();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
