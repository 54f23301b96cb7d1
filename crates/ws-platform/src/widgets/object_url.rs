use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};
use ws_core::ports::{ModuleBlob, ObjectUrlPort};

/// Object URL table for fetched module blobs.
///
/// URLs have the form `blob:widget-shell/<uuid>`; revoking one frees its blob.
#[derive(Debug, Default)]
pub struct InMemoryObjectUrlStore {
    blobs: Mutex<HashMap<String, ModuleBlob>>,
}

impl InMemoryObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self, url: &str) -> Option<ModuleBlob> {
        let guard = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(url).cloned()
    }

    /// Number of URLs created and not yet revoked.
    pub fn live_count(&self) -> usize {
        let guard = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        guard.len()
    }
}

impl ObjectUrlPort for InMemoryObjectUrlStore {
    fn create_object_url(&self, blob: ModuleBlob) -> String {
        let url = format!("blob:widget-shell/{}", uuid::Uuid::new_v4());
        debug!(%url, mime = blob.mime, bytes = blob.source.len(), "object url created");
        let mut guard = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(url.clone(), blob);
        url
    }

    fn revoke_object_url(&self, url: &str) {
        let mut guard = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        if guard.remove(url).is_none() {
            warn!(%url, "revoking unknown object url");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_revoke() {
        let store = InMemoryObjectUrlStore::new();
        let url = store.create_object_url(ModuleBlob::javascript("{}".to_string()));
        assert!(url.starts_with("blob:widget-shell/"));
        assert_eq!(store.blob(&url).unwrap().mime, "application/javascript");
        assert_eq!(store.live_count(), 1);

        store.revoke_object_url(&url);
        assert!(store.blob(&url).is_none());
        assert_eq!(store.live_count(), 0);
    }
}
