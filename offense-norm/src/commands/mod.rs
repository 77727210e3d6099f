// offense-norm/src/commands/mod.rs
//! Command implementations. Each command builds its engine from the layered
//! configuration: built-in defaults, then `--config`, then per-command flags.

pub mod explain;
pub mod normalize;
pub mod rules;

use anyhow::Result;
use log::debug;
use std::path::Path;

use offense_norm_core::config::NormalizerConfig;

use crate::cli::CatalogArgs;

/// Loads the configuration file (if any) and applies command-line overrides.
pub fn resolve_config(config_path: Option<&Path>, overrides: &CatalogArgs) -> Result<NormalizerConfig> {
    let mut config = match config_path {
        Some(path) => NormalizerConfig::load_from_file(path)?,
        None => NormalizerConfig::default(),
    };
    if let Some(version) = &overrides.catalog_version {
        debug!("Catalog version overridden on the command line: {}", version);
        config.catalog_version = Some(version.clone());
    }
    if let Some(rules) = &overrides.rules {
        debug!("Extra rules overridden on the command line: {}", rules.display());
        config.extra_rules = Some(rules.clone());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_config_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"catalog_version: legacy\nextra_rules: base.yaml\n")?;

        let overrides = CatalogArgs {
            catalog_version: Some("extended".into()),
            rules: None,
        };
        let config = resolve_config(Some(file.path()), &overrides)?;
        assert_eq!(config.catalog_version.as_deref(), Some("extended"));
        assert_eq!(config.extra_rules, Some(PathBuf::from("base.yaml")));
        Ok(())
    }

    #[test]
    fn test_defaults_without_config_file() -> Result<()> {
        let config = resolve_config(None, &CatalogArgs::default())?;
        assert_eq!(config, NormalizerConfig::default());
        Ok(())
    }
}
