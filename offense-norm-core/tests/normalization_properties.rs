// offense-norm-core/tests/normalization_properties.rs
//! Behavioral properties of `normalize`: determinism, absent input, rule
//! ordering, removal ordering, finalization and the known fixed points.

use anyhow::Result;
use std::sync::Arc;
use std::thread;

use offense_norm_core::{
    build_catalog, default_catalog, normalize, Normalizer, RemovalDefinition, RuleCatalog,
    RuleDefinitions, RuleEngine, SubstitutionDefinition,
};

fn catalog(substitutions: Vec<SubstitutionDefinition>, removals: Vec<RemovalDefinition>) -> RuleCatalog {
    build_catalog(&RuleDefinitions::new("test", substitutions, removals)).unwrap()
}

const SAMPLES: &[&str] = &[
    "FRAUDULENT USE OF A CREDIT CARD OR DEBT CARD >= $25,000",
    "POSS CS SCH II W/INT TO DEL",
    "AGG ASLT W/ DNG WEAP",
    "DRIVING W/O  LIC.",
    "B&E OF BLDG W/INTENT",
    "VIOL OF PROB - VOP",
    "",
    "   ",
];

#[test]
fn test_normalize_is_deterministic() -> Result<()> {
    let catalog = default_catalog()?;
    for sample in SAMPLES {
        let first = normalize(Some(*sample), &catalog);
        for _ in 0..5 {
            assert_eq!(normalize(Some(*sample), &catalog), first);
        }
    }
    Ok(())
}

#[test]
fn test_normalize_is_deterministic_across_threads() -> Result<()> {
    let catalog = default_catalog()?;
    let expected: Vec<String> = SAMPLES.iter().map(|s| normalize(Some(*s), &catalog)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                SAMPLES
                    .iter()
                    .map(|s| normalize(Some(*s), &catalog))
                    .collect::<Vec<String>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    Ok(())
}

#[test]
fn test_absent_input_yields_empty_string() -> Result<()> {
    let catalog = default_catalog()?;
    assert_eq!(normalize(None, &catalog), "");
    assert_eq!(normalize(Some(""), &catalog), "");

    let engine = RuleEngine::new(catalog);
    assert_eq!(engine.normalize(None), "");
    Ok(())
}

#[test]
fn test_priority_cascade() {
    let cat = catalog(
        vec![
            SubstitutionDefinition::new("R2", "AB", "final").with_priority(20),
            SubstitutionDefinition::new("R1", "ab", "AB"),
        ],
        vec![],
    );
    assert_eq!(normalize(Some("ab"), &cat), "final");
}

#[test]
fn test_priority_cascade_needs_later_priority() {
    let rules = |late: i32| {
        catalog(
            vec![
                SubstitutionDefinition::new("Expand", r"\bx\b", "yz"),
                SubstitutionDefinition::new("Collapse", r"\byz\b", "final").with_priority(late),
            ],
            vec![],
        )
    };
    assert_eq!(normalize(Some("x"), &rules(20)), "final");
    // Running the consumer first leaves the producer's output untouched.
    assert_eq!(normalize(Some("x"), &rules(0)), "yz");
}

#[test]
fn test_equal_priority_ties_follow_declaration_order() {
    let a = || SubstitutionDefinition::new("Ra", "abc", "X");
    let b = || SubstitutionDefinition::new("Rb", "bc", "Y");

    let a_first = catalog(vec![a(), b()], vec![]);
    let b_first = catalog(vec![b(), a()], vec![]);

    assert_eq!(normalize(Some("abc"), &a_first), "x");
    assert_eq!(normalize(Some("abc"), &b_first), "ay");
}

#[test]
fn test_removal_runs_after_every_substitution() {
    let cat = catalog(
        vec![
            SubstitutionDefinition::new("Case Number", r"\bcase no\b", "OBSCIS").with_priority(50),
            SubstitutionDefinition::new("Theft", r"\bthft\b", "theft"),
        ],
        vec![RemovalDefinition::new("OBSCIS", "(OBSCIS)")],
    );
    assert_eq!(normalize(Some("THFT CASE NO"), &cat), "theft");
}

#[test]
fn test_removal_replaces_with_space_not_nothing() {
    let cat = catalog(vec![], vec![RemovalDefinition::new("Marker", "XX")]);
    assert_eq!(normalize(Some("AXXB"), &cat), "a b");
}

#[test]
fn test_punctuation_and_whitespace_finalization() -> Result<()> {
    let catalog = default_catalog()?;
    let out = normalize(Some("W/O  LIC."), &catalog);
    let tokens: Vec<&str> = out.split(' ').collect();
    assert!(tokens.contains(&"without"));
    assert!(tokens.contains(&"license"));
    assert!(!out.contains("  "));
    assert!(out.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
    Ok(())
}

#[test]
fn test_numeric_grouping_happens_before_substitution() {
    let cat = catalog(
        vec![SubstitutionDefinition::new("Grouped", r"\d+,\d+", "GROUPED")],
        vec![],
    );
    assert_eq!(normalize(Some("$25,000"), &cat), "25000");
    assert_eq!(normalize(Some("$1,250,000"), &cat), "1250000");
}

#[test]
fn test_end_to_end_example() -> Result<()> {
    let catalog = default_catalog()?;
    assert_eq!(
        normalize(Some("FRAUDULENT USE OF A CREDIT CARD OR DEBT CARD >= $25,000"), &catalog),
        "fraudulent use of a credit card or debt card 25000"
    );
    Ok(())
}

#[test]
fn test_known_fixed_points() -> Result<()> {
    let catalog = default_catalog()?;
    for input in ["DRIVING W/O LIC", "B&E OF BLDG", "CC FRAUD"] {
        let once = normalize(Some(input), &catalog);
        assert_eq!(normalize(Some(once.as_str()), &catalog), once, "input {input:?}");
    }
    Ok(())
}

#[test]
fn test_normalize_is_not_idempotent_in_general() -> Result<()> {
    let catalog = default_catalog()?;
    // Punctuation stripping runs after the catalog, so it can expose a new match.
    let once = normalize(Some("W_O"), &catalog);
    assert_eq!(once, "w o");
    assert_eq!(normalize(Some(once.as_str()), &catalog), "without");
    Ok(())
}

#[test]
fn test_single_pass_per_rule() {
    let cat = catalog(vec![SubstitutionDefinition::new("Grow", "a", "aa")], vec![]);
    assert_eq!(normalize(Some("a"), &cat), "aa");
}

#[test]
fn test_capture_group_replacement() {
    let cat = catalog(
        vec![SubstitutionDefinition::new("Age", r"\b(\d+) ?yoa\b", "${1} years of age")],
        vec![],
    );
    assert_eq!(normalize(Some("VICTIM 12YOA"), &cat), "victim 12 years of age");
}
