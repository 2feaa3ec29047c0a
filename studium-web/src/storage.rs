use gloo_storage::{LocalStorage, Storage};
use studium_client::{KvStore, Settings};

/// The browser's local storage, shared by every tab of the origin
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalStore;

impl KvStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = LocalStorage::set(key, value) {
            tracing::warn!(key, err = %e, "failed saving to local storage");
        }
    }

    fn delete(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

pub type AppSettings = Settings<LocalStore>;

pub fn settings() -> AppSettings {
    Settings::new(LocalStore)
}
