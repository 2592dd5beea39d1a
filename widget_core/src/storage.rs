//! `localStorage` helpers. Outside the browser every call is a no-op so the
//! widgets stay testable on the host.

use serde::Serialize;

use crate::error::WidgetResult;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Raw string stored under `key`, if storage is reachable and the key exists.
pub fn load_raw(key: &str) -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        local_storage()?.get_item(key).ok().flatten()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = key;
        None
    }
}

/// Serialises `value` as JSON under `key`. A missing or full storage is
/// logged, not fatal.
pub fn save_json<T: Serialize + ?Sized>(key: &str, value: &T) -> WidgetResult<()> {
    let raw = serde_json::to_string(value)?;
    #[cfg(target_arch = "wasm32")]
    {
        match local_storage() {
            Some(storage) => {
                if storage.set_item(key, &raw).is_err() {
                    log::warn!("localStorage rejected write for {key}");
                }
            }
            None => log::warn!("localStorage unavailable, {key} not saved"),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (key, raw);
    }
    Ok(())
}

pub fn remove(key: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = key;
    }
}
