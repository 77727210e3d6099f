//! A `Normalizer` implementation that applies a compiled rule catalog.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;

use crate::catalog::{get_or_build_catalog, RuleCatalog};
use crate::config::{NormalizerConfig, PipelineConfig};
use crate::engine::Normalizer;
use crate::pipeline::NormalizationPipeline;
use crate::trace::Normalization;

#[derive(Debug, Clone)]
pub struct RuleEngine {
    catalog: Arc<RuleCatalog>,
    pipeline: NormalizationPipeline,
}

impl RuleEngine {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self::with_pipeline(catalog, PipelineConfig::default())
    }

    pub fn with_pipeline(catalog: Arc<RuleCatalog>, config: PipelineConfig) -> Self {
        debug!(
            "RuleEngine ready: catalog '{}' ({}), {} rules.",
            catalog.version(),
            catalog.short_fingerprint(),
            catalog.len()
        );
        Self {
            catalog,
            pipeline: NormalizationPipeline::new(config),
        }
    }

    /// Resolves, merges and builds the catalog described by `config`.
    ///
    /// Any broken rule aborts construction here; the resulting engine cannot fail.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let definitions = config.rule_definitions()?;
        let catalog = get_or_build_catalog(&definitions)
            .with_context(|| format!("Failed to build catalog '{}'", definitions.version))?;
        Ok(Self::with_pipeline(catalog, config.pipeline.clone()))
    }

    pub fn shared_catalog(&self) -> Arc<RuleCatalog> {
        Arc::clone(&self.catalog)
    }
}

impl Normalizer for RuleEngine {
    fn normalize(&self, raw: Option<&str>) -> String {
        self.pipeline.run(raw, &self.catalog)
    }

    fn explain(&self, raw: Option<&str>) -> Normalization {
        self.pipeline.explain(raw, &self.catalog)
    }

    fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    fn pipeline(&self) -> &NormalizationPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RuleDefinitions, SubstitutionDefinition};

    #[test]
    fn test_rule_engine_normalizes() {
        let defs = RuleDefinitions::new(
            "t",
            vec![SubstitutionDefinition::new("Credit Card", r"\bcc\b", "credit card")],
            vec![],
        );
        let engine = RuleEngine::new(Arc::new(RuleCatalog::build(&defs).unwrap()));
        assert_eq!(engine.normalize(Some("FRAUD - CC")), "fraud credit card");
        assert_eq!(engine.normalize(None), "");
        assert_eq!(
            engine.normalize_all(&[Some("CC"), None, Some("cc.")]),
            vec!["credit card", "", "credit card"]
        );
    }

    #[test]
    fn test_from_config_uses_default_catalog() -> Result<()> {
        let engine = RuleEngine::from_config(&NormalizerConfig::default())?;
        assert_eq!(engine.catalog().version(), "standard");
        assert_eq!(engine.normalize(Some("DRIVING W/O LIC")), "driving without license");
        Ok(())
    }
}
