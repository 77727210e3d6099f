//! Configuration management for `offense-norm-core`.
//!
//! This module defines the plain data records that describe normalization rules
//! and the pipeline settings that surround them. Nothing in here compiles a
//! pattern: definitions are deserialized, filtered by catalog version, validated
//! for shape, and then handed to [`crate::catalog::RuleCatalog::build`].
//!
//! The embedded catalog lives in `config/catalog.yaml`. It keeps every historical
//! rule list in one document; each rule carries optional `since`/`until` bounds
//! naming the catalog versions it belongs to.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::NormalizerError;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Priority assigned to substitution rules that do not declare one.
pub const DEFAULT_PRIORITY: i32 = 1;

/// Version name given to rule sets that come from a source without a `versions` list.
pub const UNVERSIONED: &str = "unversioned";

/// ASCII punctuation plus the smart quotes and long dashes seen in booking data.
pub const DEFAULT_PUNCTUATION: &str = concat!(
    r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##,
    "\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}"
);

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// A pattern/replacement pair. Higher `priority` values run later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SubstitutionDefinition {
    pub description: String,
    pub pattern: String,
    /// Literal text, may reference capture groups as `$1`, `${1}` or `${name}`.
    pub replacement: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// First catalog version that contains this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Last catalog version that contains this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl SubstitutionDefinition {
    pub fn new(description: &str, pattern: &str, replacement: &str) -> Self {
        Self {
            description: description.to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            priority: DEFAULT_PRIORITY,
            since: None,
            until: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// A pattern whose matches are replaced by a single space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RemovalDefinition {
    pub description: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

impl RemovalDefinition {
    pub fn new(description: &str, pattern: &str) -> Self {
        Self {
            description: description.to_string(),
            pattern: pattern.to_string(),
            since: None,
            until: None,
        }
    }
}

/// The rules of a single catalog version, in declaration order.
///
/// This is the input to catalog construction. Declaration order is meaningful:
/// it breaks priority ties between substitutions and is the execution order of
/// removals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleDefinitions {
    pub version: String,
    pub substitutions: Vec<SubstitutionDefinition>,
    pub removals: Vec<RemovalDefinition>,
}

impl RuleDefinitions {
    pub fn new(
        version: &str,
        substitutions: Vec<SubstitutionDefinition>,
        removals: Vec<RemovalDefinition>,
    ) -> Self {
        Self {
            version: version.to_string(),
            substitutions,
            removals,
        }
    }

    /// Checks rule shape: non-empty fields and unique descriptions per rule kind.
    ///
    /// Pattern syntax is not checked here; that is the compiler's job.
    pub fn validate(&self) -> Vec<NormalizerError> {
        let mut errors = Vec::new();

        let mut seen: HashSet<&str> = HashSet::new();
        for def in &self.substitutions {
            check_fields("substitution", &def.description, &def.pattern, &mut errors);
            if !def.description.is_empty() && !seen.insert(def.description.as_str()) {
                errors.push(NormalizerError::InvalidDefinition(format!(
                    "Duplicate substitution description found: '{}'.",
                    def.description
                )));
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for def in &self.removals {
            check_fields("removal", &def.description, &def.pattern, &mut errors);
            if !def.description.is_empty() && !seen.insert(def.description.as_str()) {
                errors.push(NormalizerError::InvalidDefinition(format!(
                    "Duplicate removal description found: '{}'.",
                    def.description
                )));
            }
        }

        errors
    }

    pub fn len(&self) -> usize {
        self.substitutions.len() + self.removals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_fields(kind: &str, description: &str, pattern: &str, errors: &mut Vec<NormalizerError>) {
    if description.is_empty() {
        errors.push(NormalizerError::InvalidDefinition(format!(
            "A {} rule has an empty `description` field.",
            kind
        )));
    }
    if pattern.is_empty() {
        errors.push(NormalizerError::InvalidDefinition(format!(
            "Rule '{}' has an empty `pattern` field.",
            description
        )));
    }
}

/// A versioned rule document as stored on disk.
///
/// `versions` is ordered oldest to newest. A rule belongs to version `v` when
/// `since <= v <= until` in that ordering; a missing bound is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSource {
    pub versions: Vec<String>,
    pub default_version: Option<String>,
    pub substitutions: Vec<SubstitutionDefinition>,
    pub removals: Vec<RemovalDefinition>,
}

impl CatalogSource {
    /// Loads the catalog compiled into the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default catalog from embedded string...");
        let default_yaml = include_str!("../config/catalog.yaml");
        let source = Self::from_yaml_str(default_yaml).context("Failed to parse default catalog")?;
        debug!(
            "Loaded default catalog: {} substitutions, {} removals across {} versions.",
            source.substitutions.len(),
            source.removals.len(),
            source.versions.len()
        );
        Ok(source)
    }

    /// Loads a catalog (or a set of extra rules) from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading catalog rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let source = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        info!(
            "Loaded {} rules from file {}.",
            source.substitutions.len() + source.removals.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let source: CatalogSource = serde_yml::from_str(yaml)?;
        Ok(source)
    }

    /// The version `resolve(None)` would select.
    pub fn default_version_name(&self) -> &str {
        self.default_version
            .as_deref()
            .or_else(|| self.versions.last().map(String::as_str))
            .unwrap_or(UNVERSIONED)
    }

    /// Selects the rules belonging to `version` (or the default version).
    ///
    /// All shape problems are collected and reported together.
    pub fn resolve(&self, version: Option<&str>) -> Result<RuleDefinitions, NormalizerError> {
        let (name, selected) = self.select_version(version)?;
        let mut errors = Vec::new();

        let mut substitutions = Vec::new();
        for def in &self.substitutions {
            match self.is_member(&def.description, def.since.as_deref(), def.until.as_deref(), selected) {
                Ok(true) => substitutions.push(def.clone()),
                Ok(false) => {}
                Err(e) => errors.push(e),
            }
        }

        let mut removals = Vec::new();
        for def in &self.removals {
            match self.is_member(&def.description, def.since.as_deref(), def.until.as_deref(), selected) {
                Ok(true) => removals.push(def.clone()),
                Ok(false) => {}
                Err(e) => errors.push(e),
            }
        }

        let definitions = RuleDefinitions {
            version: name,
            substitutions,
            removals,
        };
        errors.extend(definitions.validate());

        match NormalizerError::from_many(errors) {
            Some(err) => Err(err),
            None => {
                debug!(
                    "Resolved catalog version '{}': {} substitutions, {} removals.",
                    definitions.version,
                    definitions.substitutions.len(),
                    definitions.removals.len()
                );
                Ok(definitions)
            }
        }
    }

    fn select_version(&self, version: Option<&str>) -> Result<(String, Option<usize>), NormalizerError> {
        if self.versions.is_empty() {
            return match version.or(self.default_version.as_deref()) {
                Some(v) => Err(NormalizerError::UnknownCatalogVersion(v.to_string())),
                None => Ok((UNVERSIONED.to_string(), None)),
            };
        }

        let name = version.unwrap_or_else(|| self.default_version_name());
        self.position(name)
            .map(|idx| (name.to_string(), Some(idx)))
            .ok_or_else(|| NormalizerError::UnknownCatalogVersion(name.to_string()))
    }

    fn position(&self, version: &str) -> Option<usize> {
        self.versions.iter().position(|v| v == version)
    }

    fn is_member(
        &self,
        description: &str,
        since: Option<&str>,
        until: Option<&str>,
        selected: Option<usize>,
    ) -> Result<bool, NormalizerError> {
        let Some(selected) = selected else {
            if since.is_some() || until.is_some() {
                return Err(NormalizerError::InvalidDefinition(format!(
                    "Rule '{}' declares a version bound but the catalog lists no versions.",
                    description
                )));
            }
            return Ok(true);
        };

        let bound = |name: Option<&str>, field: &str| -> Result<Option<usize>, NormalizerError> {
            match name {
                None => Ok(None),
                Some(n) => self.position(n).map(Some).ok_or_else(|| {
                    NormalizerError::InvalidDefinition(format!(
                        "Rule '{}': unknown version '{}' in `{}`.",
                        description, n, field
                    ))
                }),
            }
        };

        let lo = bound(since, "since")?;
        let hi = bound(until, "until")?;
        if let (Some(lo), Some(hi)) = (lo, hi) {
            if lo > hi {
                return Err(NormalizerError::InvalidDefinition(format!(
                    "Rule '{}': `since` is newer than `until`.",
                    description
                )));
            }
        }

        Ok(lo.map_or(true, |lo| lo <= selected) && hi.map_or(true, |hi| selected <= hi))
    }
}

/// Merges user-supplied rules into a base rule set.
///
/// A user rule whose description matches a base rule of the same kind replaces
/// it at the base rule's position; declaration order is semantics, so it is
/// never reshuffled. Remaining user rules are appended in their own order.
pub fn merge_definitions(base: RuleDefinitions, user: Option<RuleDefinitions>) -> RuleDefinitions {
    let Some(user) = user else {
        return base;
    };
    debug!(
        "Merging {} user rules into catalog version '{}'.",
        user.len(),
        base.version
    );

    let substitutions = merge_in_place(base.substitutions, user.substitutions, |d| d.description.as_str());
    let removals = merge_in_place(base.removals, user.removals, |d| d.description.as_str());

    RuleDefinitions {
        version: format!("{}+{}", base.version, user.version),
        substitutions,
        removals,
    }
}

fn merge_in_place<T, F>(mut base: Vec<T>, user: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut appended = Vec::new();
    for rule in user {
        match base.iter().position(|b| key(b) == key(&rule)) {
            Some(idx) => {
                debug!("User rule '{}' overrides the built-in rule.", key(&rule));
                base[idx] = rule;
            }
            None => appended.push(rule),
        }
    }
    base.extend(appended);
    base
}

/// Fixed settings of the normalization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Every character in this string is replaced by a space during finalization.
    pub punctuation: String,
    /// Strip thousands separators ("25,000" -> "25000") before substitution.
    pub numeric_comma_removal: bool,
    /// Strip possessive apostrophes ("victim's" -> "victims") before substitution.
    pub possessive_stripping: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            punctuation: DEFAULT_PUNCTUATION.to_string(),
            numeric_comma_removal: true,
            possessive_stripping: true,
        }
    }
}

/// Top-level configuration: which catalog to build and how the pipeline behaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Catalog version to resolve; the catalog's default when absent.
    pub catalog_version: Option<String>,
    /// Extra rules merged on top of the embedded catalog.
    pub extra_rules: Option<PathBuf>,
    pub pipeline: PipelineConfig,
}

impl NormalizerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading normalizer config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: NormalizerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolves the embedded catalog and merges any extra rules on top.
    pub fn rule_definitions(&self) -> Result<RuleDefinitions> {
        let version = self.catalog_version.as_deref();
        let base = crate::catalog::default_source()?
            .resolve(version)
            .context("Failed to resolve the built-in catalog")?;

        let user = match &self.extra_rules {
            Some(path) => {
                let source = CatalogSource::load_from_file(path)?;
                let user_version = if source.versions.is_empty() {
                    if version.is_some() {
                        warn!(
                            "Extra rules in {} are unversioned; they apply to every catalog version.",
                            path.display()
                        );
                    }
                    None
                } else {
                    version
                };
                let defs = source
                    .resolve(user_version)
                    .with_context(|| format!("Failed to resolve extra rules from {}", path.display()))?;
                Some(defs)
            }
            None => None,
        };

        Ok(merge_definitions(base, user))
    }
}
