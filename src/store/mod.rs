//! In-memory secret table
//!
//! Discovered secrets are kept in a thread-safe table, deduplicated by
//! identity (`hostname:value`) and indexed by hostname and pattern key so
//! the export step can group them without a full scan.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// A credential-shaped string found in page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    /// Dedup key: `hostname:value`.
    pub identity: String,
    /// Hostname of the page the secret was found on.
    pub hostname: String,
    /// Name of the pattern that matched, e.g. "jwt" or "email".
    pub key: String,
    /// The matched text itself.
    pub value: String,
}

impl Secret {
    /// Creates a secret, deriving its identity from hostname and value
    pub fn new(hostname: &str, key: &str, value: &str) -> Self {
        Self {
            identity: format!("{}:{}", hostname, value),
            hostname: hostname.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Default)]
struct StoreInner {
    by_identity: HashMap<String, Secret>,
    by_hostname: BTreeMap<String, Vec<String>>,
    by_key: BTreeMap<String, Vec<String>>,
}

impl StoreInner {
    fn insert(&mut self, secret: Secret) -> bool {
        if self.by_identity.contains_key(&secret.identity) {
            return false;
        }
        self.by_hostname
            .entry(secret.hostname.clone())
            .or_default()
            .push(secret.identity.clone());
        self.by_key
            .entry(secret.key.clone())
            .or_default()
            .push(secret.identity.clone());
        self.by_identity.insert(secret.identity.clone(), secret);
        true
    }
}

/// Thread-safe table of discovered secrets.
pub struct SecretStore {
    inner: Mutex<StoreInner>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Records a secret, ignoring duplicates of an already-known identity
    ///
    /// # Returns
    ///
    /// * `true` - If the secret was newly recorded
    /// * `false` - If its identity was already present
    pub fn insert(&self, secret: Secret) -> bool {
        self.inner.lock().unwrap().insert(secret)
    }

    /// Records a batch of secrets under a single lock acquisition
    ///
    /// # Returns
    ///
    /// The number of secrets that were newly recorded.
    pub fn insert_all(&self, secrets: Vec<Secret>) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let mut added = 0;
        for secret in secrets {
            if inner.insert(secret) {
                added += 1;
            }
        }
        added
    }

    /// Looks up a secret by its identity.
    pub fn get(&self, identity: &str) -> Option<Secret> {
        self.inner.lock().unwrap().by_identity.get(identity).cloned()
    }

    /// All hostnames with at least one recorded secret, in sorted order.
    pub fn hostnames(&self) -> Vec<String> {
        self.inner.lock().unwrap().by_hostname.keys().cloned().collect()
    }

    /// Secrets recorded for one hostname, in insertion order.
    pub fn secrets_for_hostname(&self, hostname: &str) -> Vec<Secret> {
        let inner = self.inner.lock().unwrap();
        match inner.by_hostname.get(hostname) {
            Some(identities) => identities
                .iter()
                .filter_map(|id| inner.by_identity.get(id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Secrets recorded under one pattern key, in insertion order.
    pub fn secrets_for_key(&self, key: &str) -> Vec<Secret> {
        let inner = self.inner.lock().unwrap();
        match inner.by_key.get(key) {
            Some(identities) => identities
                .iter()
                .filter_map(|id| inner.by_identity.get(id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of distinct secrets recorded.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}
