// offense-norm-core/tests/catalog_tests.rs
//! Integration tests for the embedded, versioned rule catalog.
//!
//! These tests build every catalog version shipped in `config/catalog.yaml`
//! and pin down the behavior that distinguishes one version from another.

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

use offense_norm_core::catalog::default_source;
use offense_norm_core::{catalog_for_version, default_catalog, normalize, NormalizationRule, RuleKind};

#[test]
fn test_every_shipped_version_builds() -> Result<()> {
    let source = default_source()?;
    assert_eq!(source.versions, vec!["legacy", "standard", "extended"]);
    for version in &source.versions {
        let catalog = catalog_for_version(Some(version))?;
        assert_eq!(catalog.version(), version);
        assert!(!catalog.is_empty());
    }
    Ok(())
}

#[test]
fn test_version_sizes() -> Result<()> {
    let legacy = catalog_for_version(Some("legacy"))?;
    let standard = catalog_for_version(Some("standard"))?;
    let extended = catalog_for_version(Some("extended"))?;

    assert_eq!(legacy.substitutions().len(), 39);
    assert_eq!(standard.substitutions().len(), 71);
    assert_eq!(extended.substitutions().len(), 165);
    for catalog in [&legacy, &standard, &extended] {
        assert_eq!(catalog.removals().len(), 2);
    }
    Ok(())
}

#[test]
fn test_default_catalog_is_standard_and_cached() -> Result<()> {
    let default = default_catalog()?;
    let standard = catalog_for_version(Some("standard"))?;
    assert_eq!(default.version(), "standard");
    assert!(Arc::ptr_eq(&default, &standard));
    Ok(())
}

#[test]
fn test_fingerprints_differ_between_versions() -> Result<()> {
    let mut seen = HashSet::new();
    for version in ["legacy", "standard", "extended"] {
        let catalog = catalog_for_version(Some(version))?;
        assert_eq!(catalog.fingerprint().len(), 64);
        assert!(seen.insert(catalog.fingerprint().to_string()));
    }
    Ok(())
}

#[test]
fn test_unknown_version_is_rejected() {
    let err = catalog_for_version(Some("v2")).unwrap_err();
    assert!(format!("{err:#}").contains("v2"));
}

#[test]
fn test_substance_runs_last_in_standard() -> Result<()> {
    let catalog = catalog_for_version(Some("standard"))?;
    let last = catalog.substitutions().last().unwrap();
    assert_eq!(last.description(), "Substance");
    assert_eq!(last.priority(), 20);
    Ok(())
}

#[test]
fn test_removals_run_in_declaration_order() -> Result<()> {
    let catalog = default_catalog()?;
    let order: Vec<&str> = catalog.removals().iter().map(|r| r.description()).collect();
    assert_eq!(order, vec!["OBSCIS", "MO Suffix"]);
    assert!(catalog.find(RuleKind::Removal, "OBSCIS").is_some());
    Ok(())
}

#[test]
fn test_legacy_controlled_substance_is_narrower() -> Result<()> {
    let legacy = catalog_for_version(Some("legacy"))?;
    let standard = catalog_for_version(Some("standard"))?;
    assert_eq!(normalize(Some("CONT SUBST"), &legacy), "cont subst");
    assert_eq!(normalize(Some("CONT SUBST"), &standard), "controlled substance");
    Ok(())
}

#[test]
fn test_schedule_expansion_per_version() -> Result<()> {
    let input = Some("POSS CS SCH II");
    assert_eq!(
        normalize(input, &*catalog_for_version(Some("legacy"))?),
        "possession controlled substance sch ii"
    );
    assert_eq!(
        normalize(input, &*catalog_for_version(Some("standard"))?),
        "possession controlled substance schedule ii"
    );
    assert_eq!(
        normalize(input, &*catalog_for_version(Some("extended"))?),
        "possession controlled substance schedule two"
    );
    Ok(())
}

#[test]
fn test_extended_generic_schedule_still_applies() -> Result<()> {
    let extended = catalog_for_version(Some("extended"))?;
    assert_eq!(normalize(Some("SCH"), &extended), "schedule");
    assert_eq!(normalize(Some("SCHEDULE 2"), &extended), "schedule two");
    Ok(())
}

#[test]
fn test_extended_cascades_over_standard_output() -> Result<()> {
    let standard = catalog_for_version(Some("standard"))?;
    let extended = catalog_for_version(Some("extended"))?;
    // "dom" and "viol" expand independently; only extended repairs the phrase.
    assert_eq!(normalize(Some("DOM VIOL"), &standard), "domestic violent");
    assert_eq!(normalize(Some("DOM VIOL"), &extended), "domestic violence");
    assert_eq!(normalize(Some("CRIM MISCH"), &extended), "criminal mischief");
    Ok(())
}

#[test]
fn test_extended_capture_group_rules() -> Result<()> {
    let extended = catalog_for_version(Some("extended"))?;
    assert_eq!(
        normalize(Some("AGG ASLT W/ WEAP ON A B/M 12YOA"), &extended),
        "aggravated assault w weapon on a black male 12 years of age"
    );
    assert_eq!(
        normalize(Some("CSC 1ST DEG U13"), &extended),
        "criminal sexual conduct first degree under 13"
    );
    Ok(())
}

#[test]
fn test_mo_suffix_is_removed() -> Result<()> {
    let catalog = default_catalog()?;
    assert_eq!(normalize(Some("THEFT X X XX X 01/02/2003"), &catalog), "theft");
    assert_eq!(normalize(Some("THEFT OBSCIS"), &catalog), "theft");
    Ok(())
}
