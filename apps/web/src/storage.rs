use tariff_core::{MemoryFlagStore, SessionFlagStore};
use web_sys::Storage;

/// Session flags backed by `window.sessionStorage`.
///
/// Falls back to memory when storage is unavailable (private mode, sandboxed
/// iframes), so the popup still shows at most once per page load.
pub struct SessionStorageFlags {
    storage: Option<Storage>,
    fallback: MemoryFlagStore,
}

impl SessionStorageFlags {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.session_storage().ok().flatten());
        if storage.is_none() {
            web_sys::console::warn_1(&"sessionStorage unavailable, using memory flags".into());
        }
        Self {
            storage,
            fallback: MemoryFlagStore::default(),
        }
    }
}

impl SessionFlagStore for SessionStorageFlags {
    fn get(&self, key: &str) -> bool {
        let stored = self
            .storage
            .as_ref()
            .and_then(|storage| storage.get_item(key).ok().flatten())
            .is_some_and(|value| value == "true");
        stored || self.fallback.get(key)
    }

    fn set(&mut self, key: &str) {
        self.fallback.set(key);
        if let Some(storage) = self.storage.as_ref() {
            if storage.set_item(key, "true").is_err() {
                web_sys::console::warn_1(&format!("could not persist {key}").into());
            }
        }
    }
}
