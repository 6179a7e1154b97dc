use greeting_core::{PreferenceStore, StoreError};
use wasm_bindgen::JsValue;

/// `window.localStorage`. Private browsing and disabled storage surface
/// as `StoreError::Unavailable`; callers fall back to defaults.
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; motion preference will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("no localStorage".into()))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(describe(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected {
                key: key.to_string(),
                reason: describe(e),
            })
    }
}
