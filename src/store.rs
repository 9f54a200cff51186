//! In-memory credential store.
//!
//! A thread-safe username→password mapping shared by all sessions.
//! Registration is the only mutation path; there is no update and no
//! deletion. Passwords are stored verbatim — the protocol predates any
//! hashing scheme and clients depend on exact-match semantics.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, trace};

/// Thread-safe in-memory credential storage
pub struct CredentialStore {
    users: RwLock<HashMap<String, String>>,
}

impl CredentialStore {
    /// Create a new empty store
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            users: RwLock::new(HashMap::new()),
        })
    }

    /// Insert a user only if the username is not already taken.
    ///
    /// The check and the insert happen under one write lock, so two
    /// concurrent registrations for the same username yield exactly one
    /// success.
    pub fn insert_if_absent(&self, username: &str, password: &str) -> bool {
        let mut users = self.users.write().unwrap();
        if users.contains_key(username) {
            trace!(username, "Registration rejected, username taken");
            return false;
        }
        users.insert(username.to_string(), password.to_string());
        debug!(username, total = users.len(), "User registered");
        true
    }

    /// Check a username/password pair against the stored record.
    ///
    /// Returns true only if the username exists and the stored password
    /// matches byte for byte.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let users = self.users.read().unwrap();
        match users.get(username) {
            Some(stored) => stored == password,
            None => false,
        }
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// Whether the store is empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_and_verify() {
        let store = CredentialStore::new();

        assert!(store.insert_if_absent("alice", "secret"));
        assert!(store.verify("alice", "secret"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = CredentialStore::new();

        assert!(store.insert_if_absent("alice", "secret"));
        assert!(!store.insert_if_absent("alice", "other"));

        // First password wins; there is no update path.
        assert!(store.verify("alice", "secret"));
        assert!(!store.verify("alice", "other"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_verify_unknown_user() {
        let store = CredentialStore::new();
        assert!(!store.verify("nobody", "anything"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let store = CredentialStore::new();
        store.insert_if_absent("alice", "secret");
        assert!(!store.verify("alice", "Secret"));
        assert!(!store.verify("alice", ""));
    }

    #[test]
    fn test_empty_username_is_a_key() {
        let store = CredentialStore::new();
        assert!(store.insert_if_absent("", ""));
        assert!(store.verify("", ""));
        assert!(!store.insert_if_absent("", "other"));
    }

    #[test]
    fn test_concurrent_registration_single_winner() {
        let store = CredentialStore::new();
        let mut handles = Vec::new();

        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.insert_if_absent("alice", &format!("password{i}"))
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&inserted| inserted)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_disjoint_usernames() {
        let store = CredentialStore::new();
        let mut handles = Vec::new();

        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                assert!(store.insert_if_absent(&format!("user{i}"), "pw"));
            }));
        }

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 16);
    }
}
