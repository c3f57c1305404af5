use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Process-local table of `blob:` URLs pointing at in-memory file bytes.
///
/// Each [`ObjectUrl`] handed out by [`ObjectUrlRegistry::create`] revokes itself on drop, so a
/// decode that acquires one releases it on every exit path.
#[derive(Clone, Debug, Default)]
pub struct ObjectUrlRegistry {
    inner: Arc<Mutex<HashMap<String, Arc<[u8]>>>>,
}

impl ObjectUrlRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under a fresh `blob:` URL.
    pub fn create(&self, bytes: Arc<[u8]>) -> ObjectUrl {
        let url = format!("blob:memeforge/{}", uuid::Uuid::new_v4());
        self.lock().insert(url.clone(), bytes);
        tracing::trace!(%url, "object url created");
        ObjectUrl {
            url,
            registry: self.clone(),
        }
    }

    /// Bytes behind a live URL.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().get(url).cloned()
    }

    /// Revoke a URL. Returns `false` if it was not live.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.lock().remove(url).is_some();
        if removed {
            tracing::trace!(%url, "object url revoked");
        }
        removed
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Scoped `blob:` URL; revoked when dropped.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
    registry: ObjectUrlRegistry,
}

impl ObjectUrl {
    /// The `blob:` URL string.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/object_url.rs"]
mod tests;
