//! `rules` commands: list a catalog, list built-in versions, validate a catalog file.

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use log::{debug, info};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use offense_norm_core::catalog::default_source;
use offense_norm_core::config::CatalogSource;
use offense_norm_core::{build_catalog, NormalizationRule, Normalizer, RuleCatalog, RuleEngine, RuleKind};

use crate::cli::{CatalogArgs, RulesCommand};
use crate::commands::resolve_config;
use crate::ui::output;

/// One catalog rule as shown by `rules list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRow {
    /// 1-based position in execution order.
    pub order: usize,
    pub kind: String,
    pub description: String,
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Entry point for `offense-norm rules ...`.
pub fn run_rules(cmd: RulesCommand, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        RulesCommand::List { catalog, json } => list_rules(&catalog, config_path, json),
        RulesCommand::Versions => list_versions(),
        RulesCommand::Validate { file } => validate_file(&file),
    }
}

/// Flattens a catalog into rows, substitutions first, each in execution order.
pub fn rule_rows(catalog: &RuleCatalog) -> Vec<RuleRow> {
    let substitutions = catalog.substitutions().iter().map(|rule| RuleRow {
        order: 0,
        kind: RuleKind::Substitution.to_string(),
        description: rule.description().to_string(),
        pattern: rule.pattern().as_str().to_string(),
        replacement: Some(rule.replacement().to_string()),
        priority: Some(rule.priority()),
    });
    let removals = catalog.removals().iter().map(|rule| RuleRow {
        order: 0,
        kind: RuleKind::Removal.to_string(),
        description: rule.description().to_string(),
        pattern: rule.pattern().as_str().to_string(),
        replacement: None,
        priority: None,
    });

    substitutions
        .chain(removals)
        .enumerate()
        .map(|(idx, row)| RuleRow { order: idx + 1, ..row })
        .collect()
}

fn list_rules(args: &CatalogArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = resolve_config(config_path, args)?;
    let engine = RuleEngine::from_config(&config)?;
    let catalog = engine.catalog();
    let rows = rule_rows(catalog);
    debug!("Listing {} rules of catalog '{}'.", rows.len(), catalog.version());

    let mut stdout = io::stdout().lock();
    if json {
        let text = serde_json::to_string_pretty(&rows).context("Failed to serialize rule list")?;
        writeln!(stdout, "{}", text)?;
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Kind", "Priority", "Description", "Pattern", "Replacement"]);
    for row in &rows {
        table.add_row(vec![
            row.order.to_string(),
            row.kind.clone(),
            row.priority.map(|p| p.to_string()).unwrap_or_default(),
            row.description.clone(),
            row.pattern.clone(),
            row.replacement.clone().unwrap_or_default(),
        ]);
    }
    writeln!(stdout, "{}", table)?;
    writeln!(
        stdout,
        "Catalog '{}' ({}): {} substitutions, {} removals.",
        catalog.version(),
        catalog.short_fingerprint(),
        catalog.substitutions().len(),
        catalog.removals().len()
    )?;
    Ok(())
}

fn list_versions() -> Result<()> {
    let source = default_source()?;
    let default = source.default_version_name();
    let mut stdout = io::stdout().lock();
    for version in &source.versions {
        let definitions = source
            .resolve(Some(version))
            .with_context(|| format!("Failed to resolve catalog version '{}'", version))?;
        let marker = if version == default { " (default)" } else { "" };
        writeln!(
            stdout,
            "{}{}: {} substitutions, {} removals",
            version,
            marker,
            definitions.substitutions.len(),
            definitions.removals.len()
        )?;
    }
    Ok(())
}

/// Resolves and builds every version of the catalog in `file`.
///
/// All versions are checked before reporting, so one run shows every broken rule.
pub fn validate_file(file: &Path) -> Result<()> {
    let source = CatalogSource::load_from_file(file)?;
    let versions: Vec<Option<&str>> = if source.versions.is_empty() {
        vec![None]
    } else {
        source.versions.iter().map(|v| Some(v.as_str())).collect()
    };

    let stdout_colors = output::stdout_supports_color();
    let stderr_colors = output::stderr_supports_color();
    let mut failures = 0;

    for version in &versions {
        let result = source
            .resolve(*version)
            .and_then(|definitions| build_catalog(&definitions));
        match result {
            Ok(catalog) => {
                info!("Catalog version '{}' is valid.", catalog.version());
                output::print_success_message(
                    &mut io::stdout(),
                    &format!(
                        "OK: '{}' ({} rules, fingerprint {})",
                        catalog.version(),
                        catalog.len(),
                        catalog.short_fingerprint()
                    ),
                    stdout_colors,
                )?;
            }
            Err(e) => {
                failures += 1;
                output::print_error_message(
                    &mut io::stderr(),
                    &format!("'{}': {}", version.unwrap_or(source.default_version_name()), e),
                    stderr_colors,
                )?;
            }
        }
    }

    if failures > 0 {
        bail!(
            "{} of {} catalog version(s) in {} failed validation",
            failures,
            versions.len(),
            file.display()
        );
    }
    Ok(())
}
