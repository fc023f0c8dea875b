//! `window.localStorage` as a layout backend.

use orbit_editor::{StorageBackend, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

/// Browser local storage. Falls back to "unavailable" when there is no
/// window or the page may not use storage (sandboxed iframe, privacy mode).
pub struct LocalStorage {
    inner: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self {
            inner: open_local_storage(),
        }
    }

    /// A backend with no storage behind it; every operation fails softly.
    pub fn detached() -> Self {
        Self { inner: None }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.inner
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".into()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

#[cfg(target_arch = "wasm32")]
fn open_local_storage() -> Option<Storage> {
    match web_sys::window()?.local_storage() {
        Ok(storage) => storage,
        Err(e) => {
            log::warn!("localStorage blocked: {}", describe(&e));
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_local_storage() -> Option<Storage> {
    None
}

fn js_error(e: JsValue) -> StorageError {
    match e.dyn_ref::<DomException>() {
        Some(ex) if ex.name() == "QuotaExceededError" => StorageError::QuotaExceeded,
        _ => StorageError::Unavailable(describe(&e)),
    }
}

fn describe(e: &JsValue) -> String {
    if let Some(ex) = e.dyn_ref::<DomException>() {
        format!("{}: {}", ex.name(), ex.message())
    } else {
        e.as_string().unwrap_or_else(|| format!("{e:?}"))
    }
}
