//! catalog.rs - The immutable, compiled rule catalog.
//!
//! A [`RuleCatalog`] is built once from a [`RuleDefinitions`] value and then
//! shared read-only by every normalization call. Building compiles every
//! pattern, reports every broken rule at once, and fixes the substitution
//! execution order by a stable sort on `(priority, declaration_index)`. That
//! order is stored, so no normalization call ever re-sorts.
//!
//! Catalogs built through [`get_or_build_catalog`] are cached process-wide,
//! keyed by a SHA-256 fingerprint of their definitions.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use log::debug;
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{CatalogSource, RuleDefinitions};
use crate::errors::NormalizerError;
use crate::rules::{NormalizationRule, RemovalRule, RuleKind, SubstitutionRule};

/// An immutable set of compiled substitution and removal rules.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    version: String,
    fingerprint: String,
    /// Stored in execution order.
    substitutions: Vec<SubstitutionRule>,
    /// Stored in declaration order, which is also execution order.
    removals: Vec<RemovalRule>,
}

impl RuleCatalog {
    /// Compiles `definitions` into a catalog.
    ///
    /// Fails if any rule is malformed; a broken rule never silently drops out.
    pub fn build(definitions: &RuleDefinitions) -> Result<Self, NormalizerError> {
        debug!(
            "Starting build of catalog '{}' with {} substitutions and {} removals.",
            definitions.version,
            definitions.substitutions.len(),
            definitions.removals.len()
        );

        let mut errors = definitions.validate();

        let mut substitutions = Vec::with_capacity(definitions.substitutions.len());
        for (index, def) in definitions.substitutions.iter().enumerate() {
            match SubstitutionRule::compile(def, index) {
                Ok(rule) => substitutions.push(rule),
                Err(e) => errors.push(e),
            }
        }

        let mut removals = Vec::with_capacity(definitions.removals.len());
        for def in &definitions.removals {
            match RemovalRule::compile(def) {
                Ok(rule) => removals.push(rule),
                Err(e) => errors.push(e),
            }
        }

        if let Some(err) = NormalizerError::from_many(errors) {
            return Err(err);
        }

        substitutions.sort_by_key(SubstitutionRule::execution_key);

        let catalog = Self {
            version: definitions.version.clone(),
            fingerprint: fingerprint(definitions),
            substitutions,
            removals,
        };
        debug!(
            "Finished building catalog '{}' ({}).",
            catalog.version,
            catalog.short_fingerprint()
        );
        Ok(catalog)
    }

    /// Resolves `version` from `source` and builds it.
    pub fn from_source(source: &CatalogSource, version: Option<&str>) -> Result<Self, NormalizerError> {
        Self::build(&source.resolve(version)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Hex SHA-256 over the version name and every rule's definition.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12.min(self.fingerprint.len())]
    }

    /// Substitution rules in the order they execute.
    pub fn substitutions(&self) -> &[SubstitutionRule] {
        &self.substitutions
    }

    /// Removal rules in the order they execute.
    pub fn removals(&self) -> &[RemovalRule] {
        &self.removals
    }

    /// Every rule in execution order: all substitutions, then all removals.
    pub fn rules(&self) -> impl Iterator<Item = &dyn NormalizationRule> {
        self.substitutions
            .iter()
            .map(|r| r as &dyn NormalizationRule)
            .chain(self.removals.iter().map(|r| r as &dyn NormalizationRule))
    }

    pub fn find(&self, kind: RuleKind, description: &str) -> Option<&dyn NormalizationRule> {
        self.rules()
            .find(|r| r.kind() == kind && r.description() == description)
    }

    pub fn len(&self) -> usize {
        self.substitutions.len() + self.removals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hashes resolved definitions into a stable cache key.
///
/// Version bounds are not part of the key; only what the catalog will execute is.
pub fn fingerprint(definitions: &RuleDefinitions) -> String {
    let mut hasher = Sha256::new();
    hasher.update(definitions.version.as_bytes());
    for def in &definitions.substitutions {
        hasher.update(b"\0S\0");
        hasher.update(def.description.as_bytes());
        hasher.update(b"\0");
        hasher.update(def.pattern.as_bytes());
        hasher.update(b"\0");
        hasher.update(def.replacement.as_bytes());
        hasher.update(b"\0");
        hasher.update(def.priority.to_le_bytes());
    }
    for def in &definitions.removals {
        hasher.update(b"\0R\0");
        hasher.update(def.description.as_bytes());
        hasher.update(b"\0");
        hasher.update(def.pattern.as_bytes());
    }
    hex::encode(hasher.finalize())
}

lazy_static! {
    /// Process-wide cache of built catalogs, keyed by definition fingerprint.
    static ref CATALOG_CACHE: RwLock<HashMap<String, Arc<RuleCatalog>>> = RwLock::new(HashMap::new());
}

static DEFAULT_SOURCE: OnceCell<CatalogSource> = OnceCell::new();

/// Gets a built catalog from the cache or builds and caches it.
pub fn get_or_build_catalog(definitions: &RuleDefinitions) -> Result<Arc<RuleCatalog>, NormalizerError> {
    let cache_key = fingerprint(definitions);

    {
        let cache = CATALOG_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = cache.get(&cache_key) {
            debug!("Serving catalog '{}' from cache.", catalog.version());
            return Ok(Arc::clone(catalog));
        }
    }

    debug!("Catalog '{}' not found in cache. Building now.", definitions.version);
    let built = Arc::new(RuleCatalog::build(definitions)?);

    // Another thread may have won the race; keep whichever landed first.
    let mut cache = CATALOG_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    let cached = cache.entry(cache_key).or_insert(built);
    Ok(Arc::clone(cached))
}

/// The embedded catalog source, parsed once per process.
pub fn default_source() -> Result<&'static CatalogSource> {
    DEFAULT_SOURCE.get_or_try_init(CatalogSource::load_default)
}

/// Builds (or fetches from cache) a version of the embedded catalog.
pub fn catalog_for_version(version: Option<&str>) -> Result<Arc<RuleCatalog>> {
    let definitions = default_source()?
        .resolve(version)
        .with_context(|| format!("Failed to resolve catalog version {:?}", version))?;
    let catalog = get_or_build_catalog(&definitions)
        .with_context(|| format!("Failed to build catalog version '{}'", definitions.version))?;
    Ok(catalog)
}

/// The embedded catalog's default version.
pub fn default_catalog() -> Result<Arc<RuleCatalog>> {
    catalog_for_version(None)
}
