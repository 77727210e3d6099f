//! A `Normalizer` wrapper that memoizes results by raw input.
//!
//! Bulk offense files repeat the same descriptions thousands of times, so the
//! classification layer may put this in front of a [`RuleEngine`](super::rule_engine::RuleEngine).
//! The wrapped normalizer stays pure; caching lives entirely here, behind the
//! injectable [`MemoStore`] trait. Eviction and sizing are the store's business.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::catalog::RuleCatalog;
use crate::engine::Normalizer;
use crate::pipeline::NormalizationPipeline;
use crate::trace::Normalization;

/// A concurrent key-value store for memoized normalizations.
pub trait MemoStore: Send + Sync {
    fn get(&self, raw: &str) -> Option<String>;
    fn insert(&self, raw: String, normalized: String);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoStore for InMemoryStore {
    fn get(&self, raw: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(raw)
            .cloned()
    }

    fn insert(&self, raw: String, normalized: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(raw, normalized);
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Hit and miss counts of a [`MemoizedNormalizer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct MemoizedNormalizer<N, S = InMemoryStore> {
    inner: N,
    store: S,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<N: Normalizer> MemoizedNormalizer<N, InMemoryStore> {
    pub fn new(inner: N) -> Self {
        Self::with_store(inner, InMemoryStore::new())
    }
}

impl<N: Normalizer, S: MemoStore> MemoizedNormalizer<N, S> {
    pub fn with_store(inner: N, store: S) -> Self {
        Self {
            inner,
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<N: Normalizer, S: MemoStore> Normalizer for MemoizedNormalizer<N, S> {
    fn normalize(&self, raw: Option<&str>) -> String {
        // Absent input is already O(1); it never touches the store.
        let Some(raw) = raw else {
            return self.inner.normalize(None);
        };

        if let Some(cached) = self.store.get(raw) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let normalized = self.inner.normalize(Some(raw));
        debug!("Memoizing normalization of {} byte input.", raw.len());
        self.store.insert(raw.to_string(), normalized.clone());
        normalized
    }

    // Traces are diagnostic; always recomputed.
    fn explain(&self, raw: Option<&str>) -> Normalization {
        self.inner.explain(raw)
    }

    fn catalog(&self) -> &RuleCatalog {
        self.inner.catalog()
    }

    fn pipeline(&self) -> &NormalizationPipeline {
        self.inner.pipeline()
    }
}
