//! Hostname filtering for discovered URLs
//!
//! Every URL harvested from a page passes through a chain of filters before
//! it is scheduled. Filters compose by conjunction: a URL survives only if
//! every filter in the chain admits it. A URL without a hostname is rejected
//! by any filter that has to inspect one.

use crate::url::{extract_hostname, matches_glob};
use url::Url;

/// A predicate over candidate URLs.
pub trait UrlFilter: Send + Sync {
    /// Returns true if the URL may be scheduled for crawling
    fn allow(&self, url: &Url) -> bool;
}

/// Admits a URL only when its hostname matches at least one glob pattern.
pub struct AllowFilter {
    patterns: Vec<String>,
}

impl AllowFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl UrlFilter for AllowFilter {
    fn allow(&self, url: &Url) -> bool {
        match extract_hostname(url) {
            Some(host) => self.patterns.iter().any(|p| matches_glob(p, &host)),
            None => false,
        }
    }
}

/// Rejects a URL when its hostname matches any glob pattern. An empty
/// pattern list admits everything with a hostname.
pub struct DenyFilter {
    patterns: Vec<String>,
}

impl DenyFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl UrlFilter for DenyFilter {
    fn allow(&self, url: &Url) -> bool {
        match extract_hostname(url) {
            Some(host) => !self.patterns.iter().any(|p| matches_glob(p, &host)),
            None => false,
        }
    }
}

/// An ordered conjunction of filters.
pub struct FilterChain {
    filters: Vec<Box<dyn UrlFilter>>,
}

impl FilterChain {
    /// Builds the chain from the configured allow/deny pattern lists
    ///
    /// The allow filter is only added when patterns are configured, so an
    /// empty allow-list places no restriction. The deny filter is always
    /// present; with no patterns it admits everything.
    ///
    /// # Arguments
    ///
    /// * `allowed` - Hostname globs a URL must match one of
    /// * `disallowed` - Hostname globs that reject a URL
    pub fn from_config(allowed: &[String], disallowed: &[String]) -> Self {
        let mut filters: Vec<Box<dyn UrlFilter>> = Vec::new();
        if !allowed.is_empty() {
            filters.push(Box::new(AllowFilter::new(allowed.to_vec())));
        }
        filters.push(Box::new(DenyFilter::new(disallowed.to_vec())));
        Self { filters }
    }

    /// Number of filters in the chain.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl UrlFilter for FilterChain {
    /// A URL passes the chain only if every filter admits it
    fn allow(&self, url: &Url) -> bool {
        self.filters.iter().all(|f| f.allow(url))
    }
}
