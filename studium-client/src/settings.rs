use std::{cell::RefCell, collections::HashMap, rc::Rc};

use chrono::{TimeZone, Utc};

use crate::api::{AuthToken, Time};

const KEY_TOKEN: &str = "token";
const KEY_USERNAME: &str = "username";
const KEY_TOUR_COMPLETED: &str = "tour-completed";
const PREFIX_COUNTDOWN: &str = "countdown:";

/// Persistent string key/value storage, last write wins
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

/// Volatile store; clones share their contents, like tabs sharing local storage
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl PartialEq for MemoryStore {
    fn eq(&self, other: &MemoryStore) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.0
            .borrow_mut()
            .insert(String::from(key), String::from(value));
    }

    fn delete(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}

/// Typed access to everything the client persists between page loads
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings<S> {
    store: S,
}

impl<S: KvStore> Settings<S> {
    pub fn new(store: S) -> Settings<S> {
        Settings { store }
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.store
            .get(KEY_TOKEN)
            .filter(|t| !t.is_empty())
            .map(AuthToken)
    }

    pub fn set_token(&self, token: &AuthToken) {
        self.store.set(KEY_TOKEN, &token.0);
    }

    pub fn clear_token(&self) {
        self.store.delete(KEY_TOKEN);
    }

    /// Name shown on comments the user submits, until the server confirms them
    pub fn username(&self) -> Option<String> {
        self.store.get(KEY_USERNAME).filter(|u| !u.is_empty())
    }

    pub fn set_username(&self, name: &str) {
        self.store.set(KEY_USERNAME, name);
    }

    /// Forgets everything tied to the logged-in user
    pub fn clear_session(&self) {
        self.store.delete(KEY_TOKEN);
        self.store.delete(KEY_USERNAME);
    }

    pub fn tour_completed(&self) -> bool {
        self.store.get(KEY_TOUR_COMPLETED).as_deref() == Some("true")
    }

    pub fn set_tour_completed(&self, done: bool) {
        match done {
            true => self.store.set(KEY_TOUR_COMPLETED, "true"),
            false => self.store.delete(KEY_TOUR_COMPLETED),
        }
    }

    pub fn countdown_deadline(&self, key: &str) -> Option<Time> {
        let millis = self
            .store
            .get(&format!("{PREFIX_COUNTDOWN}{key}"))?
            .parse::<i64>()
            .ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    pub fn set_countdown_deadline(&self, key: &str, deadline: Time) {
        self.store.set(
            &format!("{PREFIX_COUNTDOWN}{key}"),
            &deadline.timestamp_millis().to_string(),
        );
    }

    pub fn clear_countdown(&self, key: &str) {
        self.store.delete(&format!("{PREFIX_COUNTDOWN}{key}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let s = Settings::new(MemoryStore::default());
        assert_eq!(s.token(), None);
        s.set_token(&AuthToken(String::from("abc")));
        assert_eq!(s.token(), Some(AuthToken(String::from("abc"))));
        s.clear_token();
        assert_eq!(s.token(), None);
    }

    #[test]
    fn logout_forgets_the_user_but_not_the_tour() {
        let s = Settings::new(MemoryStore::default());
        s.set_token(&AuthToken(String::from("abc")));
        s.set_username("an");
        s.set_tour_completed(true);
        s.clear_session();
        assert_eq!((s.token(), s.username()), (None, None));
        assert!(s.tour_completed());
    }

    #[test]
    fn clones_share_storage() {
        let a = Settings::new(MemoryStore::default());
        let b = a.clone();
        a.set_tour_completed(true);
        assert!(b.tour_completed());
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_deadline_is_ignored() {
        let store = MemoryStore::default();
        store.set("countdown:otp", "soon");
        assert_eq!(Settings::new(store).countdown_deadline("otp"), None);
    }
}
