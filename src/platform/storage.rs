//! Key/value storage
//!
//! LocalStorage in the browser. Native builds keep values in a thread-local
//! map so persistence code paths run the same way in tests.

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Read a stored value
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Store a value; failures (quota, private mode) are logged and dropped
#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) {
    match local_storage() {
        Some(storage) => {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("Failed to store {}: {:?}", key, e);
            }
        }
        None => log::warn!("LocalStorage unavailable, {} not saved", key),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        pub static STORE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(key: &str) -> Option<String> {
    memory::STORE.with(|store| store.borrow().get(key).cloned())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(key: &str, value: &str) {
    memory::STORE.with(|store| {
        store.borrow_mut().insert(key.to_string(), value.to_string());
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove_item(key: &str) {
    memory::STORE.with(|store| {
        store.borrow_mut().remove(key);
    });
}
