//! `explain` command: shows each pipeline step that changed one description.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use offense_norm_core::{Normalization, Normalizer, RuleEngine};

use crate::cli::ExplainCommand;
use crate::commands::resolve_config;
use crate::ui::output::{self, Style};

/// Entry point for `offense-norm explain`.
pub fn run_explain(cmd: ExplainCommand, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path, &cmd.catalog)?;
    let engine = RuleEngine::from_config(&config)?;
    let report = engine.explain(Some(cmd.text.as_str()));

    let mut stdout = io::stdout().lock();
    if cmd.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize trace")?;
        writeln!(stdout, "{}", json)?;
    } else {
        render_report(&mut stdout, &report, engine.catalog().version(), output::stdout_supports_color())?;
    }
    Ok(())
}

/// Writes a human-readable trace.
pub fn render_report<W: Write>(
    writer: &mut W,
    report: &Normalization,
    catalog_version: &str,
    enable_colors: bool,
) -> io::Result<()> {
    let input = report.input.as_deref().unwrap_or("");
    writeln!(
        writer,
        "{} {}",
        output::paint("Input:", Style::Header, enable_colors),
        input
    )?;
    writeln!(
        writer,
        "{} {}",
        output::paint("Catalog:", Style::Header, enable_colors),
        catalog_version
    )?;
    writeln!(writer)?;

    if report.events.is_empty() {
        writeln!(writer, "  (no step changed the text)")?;
    }
    for (step, event) in report.events.iter().enumerate() {
        let label = match &event.rule {
            Some(rule) => format!("{} '{}'", event.stage, rule),
            None => event.stage.to_string(),
        };
        writeln!(
            writer,
            "{:>3}. {}",
            step + 1,
            output::paint(&label, if event.rule.is_some() { Style::RuleName } else { Style::Stage }, enable_colors)
        )?;
        writeln!(writer, "     - {}", output::paint(&event.before, Style::Before, enable_colors))?;
        writeln!(writer, "     + {}", output::paint(&event.after, Style::After, enable_colors))?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} {}",
        output::paint("Output:", Style::Header, enable_colors),
        report.output
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use offense_norm_core::{RuleCatalog, RuleDefinitions, SubstitutionDefinition};
    use std::sync::Arc;

    #[test]
    fn test_render_report_lists_fired_rules() -> Result<()> {
        let defs = RuleDefinitions::new(
            "t",
            vec![SubstitutionDefinition::new("Credit Card", r"\bcc\b", "credit card")],
            vec![],
        );
        let engine = RuleEngine::new(Arc::new(RuleCatalog::build(&defs)?));
        let report = engine.explain(Some("CC FRAUD."));

        let mut buf = Vec::new();
        render_report(&mut buf, &report, "t", false)?;
        let text = String::from_utf8(buf)?;

        assert!(text.contains("substitution 'Credit Card'"));
        assert!(text.contains("- CC FRAUD."));
        assert!(text.contains("+ credit card FRAUD."));
        assert!(text.ends_with("Output: credit card fraud\n"));
        Ok(())
    }

    #[test]
    fn test_render_report_without_changes() -> Result<()> {
        let engine = RuleEngine::new(Arc::new(RuleCatalog::build(&RuleDefinitions::default())?));
        let report = engine.explain(Some("theft"));
        let mut buf = Vec::new();
        render_report(&mut buf, &report, "t", false)?;
        assert!(String::from_utf8(buf)?.contains("no step changed the text"));
        Ok(())
    }
}
