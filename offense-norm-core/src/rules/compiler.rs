//! compiler.rs - Turns rule definitions into executable, case-insensitive rules.
//!
//! Compilation happens once, while a catalog is being built. A compiled rule owns
//! its `Regex` and never recompiles it; normalization calls only ever execute
//! already-validated matchers.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;
use std::fmt;

use crate::config::{RemovalDefinition, SubstitutionDefinition, MAX_PATTERN_LENGTH};
use crate::errors::NormalizerError;

/// Upper bound on the compiled size of a single rule's automaton.
pub const COMPILED_SIZE_LIMIT: usize = 10 * (1 << 20);

lazy_static! {
    /// Group references understood by `regex::Regex::replace_all`: `$$`, `${name}` and `$name`.
    static ref GROUP_REFERENCE: Regex = Regex::new(r"\$\$|\$\{([^}]*)\}|\$([A-Za-z0-9_]+)").unwrap();
}

/// The two rule variants a catalog holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Substitution,
    Removal,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Substitution => write!(f, "substitution"),
            RuleKind::Removal => write!(f, "removal"),
        }
    }
}

/// Behaviour shared by every compiled rule.
pub trait NormalizationRule: Send + Sync + fmt::Debug {
    /// Human-readable identity of the rule, unique per kind within a catalog.
    fn description(&self) -> &str;

    /// The compiled, case-insensitive matcher.
    fn pattern(&self) -> &Regex;

    fn kind(&self) -> RuleKind;

    /// Applies one global, non-overlapping pass of this rule.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str>;
}

/// Compiles a rule pattern with the options every catalog rule shares.
pub fn compile_pattern(description: &str, pattern: &str) -> Result<Regex, NormalizerError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(NormalizerError::PatternLengthExceeded(
            description.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(COMPILED_SIZE_LIMIT)
        .build()
        .map_err(|source| NormalizerError::PatternCompilation {
            rule: description.to_string(),
            source,
        })?;

    debug!(
        target: "offense_norm_core::compiler",
        "Rule '{}' compiled successfully.",
        description
    );
    Ok(regex)
}

/// Rejects replacements that name a capture group the pattern does not define.
///
/// `regex` silently expands an unknown group to the empty string, which would
/// quietly delete text. `$1a` is a common slip: it names group `1a`, not group 1.
pub fn validate_replacement(description: &str, regex: &Regex, replacement: &str) -> Result<(), NormalizerError> {
    for caps in GROUP_REFERENCE.captures_iter(replacement) {
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let name = name.as_str();
        let known = match name.parse::<usize>() {
            Ok(index) => index < regex.captures_len(),
            Err(_) => regex.capture_names().flatten().any(|n| n == name),
        };
        if !known {
            return Err(NormalizerError::InvalidReplacement {
                rule: description.to_string(),
                group: name.to_string(),
            });
        }
    }
    Ok(())
}

/// A compiled pattern -> replacement rule.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    description: String,
    regex: Regex,
    replacement: String,
    priority: i32,
    declaration_index: usize,
}

impl SubstitutionRule {
    /// Compiles `def`, remembering where it was declared for tie-breaking.
    pub fn compile(def: &SubstitutionDefinition, declaration_index: usize) -> Result<Self, NormalizerError> {
        let regex = compile_pattern(&def.description, &def.pattern)?;
        validate_replacement(&def.description, &regex, &def.replacement)?;
        Ok(Self {
            description: def.description.clone(),
            regex,
            replacement: def.replacement.clone(),
            priority: def.priority,
            declaration_index,
        })
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn declaration_index(&self) -> usize {
        self.declaration_index
    }

    /// The key substitutions are ordered by: priority first, then declaration order.
    pub fn execution_key(&self) -> (i32, usize) {
        (self.priority, self.declaration_index)
    }
}

impl NormalizationRule for SubstitutionRule {
    fn description(&self) -> &str {
        &self.description
    }

    fn pattern(&self) -> &Regex {
        &self.regex
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Substitution
    }

    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, self.replacement.as_str())
    }
}

/// A compiled rule whose matches become a single space.
#[derive(Debug, Clone)]
pub struct RemovalRule {
    description: String,
    regex: Regex,
}

impl RemovalRule {
    pub fn compile(def: &RemovalDefinition) -> Result<Self, NormalizerError> {
        let regex = compile_pattern(&def.description, &def.pattern)?;
        Ok(Self {
            description: def.description.clone(),
            regex,
        })
    }
}

impl NormalizationRule for RemovalRule {
    fn description(&self) -> &str {
        &self.description
    }

    fn pattern(&self) -> &Regex {
        &self.regex
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Removal
    }

    // A space, not "", so the tokens on either side never fuse.
    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, NoExpand(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_pattern_is_case_insensitive() {
        let regex = compile_pattern("License", r"\blic\b").unwrap();
        assert!(regex.is_match("DRIVING W/O LIC"));
        assert!(regex.is_match("no Lic here"));
    }

    #[test]
    fn test_compile_pattern_error_names_rule() {
        let err = compile_pattern("Broken Rule", r"(unclosed").unwrap_err();
        assert!(matches!(err, NormalizerError::PatternCompilation { ref rule, .. } if rule == "Broken Rule"));
        assert!(err.to_string().contains("Broken Rule"));
    }

    #[test]
    fn test_compile_pattern_length_limit() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_pattern("Long", &long).unwrap_err();
        assert!(matches!(err, NormalizerError::PatternLengthExceeded(_, len, max) if len == MAX_PATTERN_LENGTH + 1 && max == MAX_PATTERN_LENGTH));
    }

    #[test]
    fn test_substitution_expands_capture_groups() {
        let def = SubstitutionDefinition::new("Years of Age", r"\b(\d+) ?yoa\b", "${1} years of age");
        let rule = SubstitutionRule::compile(&def, 0).unwrap();
        assert_eq!(rule.apply("VICTIM 12 YOA"), "VICTIM 12 years of age");
    }

    #[test]
    fn test_substitution_rejects_missing_group() {
        let def = SubstitutionDefinition::new("Bad Group", r"\b(\d+)x\b", "$2");
        let err = SubstitutionRule::compile(&def, 0).unwrap_err();
        assert!(matches!(err, NormalizerError::InvalidReplacement { ref group, .. } if group == "2"));
    }

    #[test]
    fn test_substitution_rejects_ambiguous_group_name() {
        let def = SubstitutionDefinition::new("Fused", r"(\d+)", "$1a");
        let err = SubstitutionRule::compile(&def, 0).unwrap_err();
        assert!(matches!(err, NormalizerError::InvalidReplacement { ref group, .. } if group == "1a"));
    }

    #[test]
    fn test_substitution_accepts_named_group_and_dollar_escape() {
        let def = SubstitutionDefinition::new("Amount", r"(?P<amt>\d+) dollars", "$$${amt}");
        let rule = SubstitutionRule::compile(&def, 3).unwrap();
        assert_eq!(rule.apply("100 dollars"), "$100");
        assert_eq!(rule.execution_key(), (1, 3));
    }

    #[test]
    fn test_removal_replaces_with_space() {
        let rule = RemovalRule::compile(&RemovalDefinition::new("OBSCIS", "(OBSCIS)")).unwrap();
        assert_eq!(rule.apply("THEFTobscisFRAUD"), "THEFT FRAUD");
        assert_eq!(rule.kind(), RuleKind::Removal);
    }

    #[test]
    fn test_apply_borrows_when_nothing_matches() {
        let rule = RemovalRule::compile(&RemovalDefinition::new("OBSCIS", "(OBSCIS)")).unwrap();
        assert!(matches!(rule.apply("ASSAULT"), Cow::Borrowed(_)));
    }
}
