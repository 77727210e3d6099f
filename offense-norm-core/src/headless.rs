// File: offense-norm-core/src/headless.rs

//! `headless.rs`
//! Function-level entry points for callers that do not want to hold an engine.
//!
//! * [`build_catalog`] and [`normalize`] are the bare contract: build a catalog
//!   once, then call `normalize` once per record.
//! * [`headless_normalize_string`] is the one-shot convenience: it resolves the
//!   catalog described by a [`NormalizerConfig`] (cached process-wide) and
//!   normalizes a single string with it.

use anyhow::Result;

use crate::catalog::RuleCatalog;
use crate::config::{NormalizerConfig, RuleDefinitions};
use crate::engine::Normalizer;
use crate::engines::rule_engine::RuleEngine;
use crate::errors::NormalizerError;
use crate::pipeline::NormalizationPipeline;

/// Compiles `definitions` into an immutable catalog.
pub fn build_catalog(definitions: &RuleDefinitions) -> Result<RuleCatalog, NormalizerError> {
    RuleCatalog::build(definitions)
}

/// Normalizes `raw` with `catalog` and the default pipeline configuration.
///
/// Total and deterministic: absent input yields `""`.
pub fn normalize(raw: Option<&str>, catalog: &RuleCatalog) -> String {
    NormalizationPipeline::default().run(raw, catalog)
}

/// Normalizes a single string using the catalog and pipeline `config` describes.
pub fn headless_normalize_string(config: &NormalizerConfig, raw: Option<&str>) -> Result<String> {
    let engine = RuleEngine::from_config(config)?;
    Ok(engine.normalize(raw))
}
