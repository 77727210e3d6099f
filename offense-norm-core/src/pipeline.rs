//! pipeline.rs - The staged normalization pipeline.
//!
//! Stage order is fixed:
//!
//! 1. numeric regrouping (`25,000` -> `25000`)
//! 2. possessive stripping (`victim's` -> `victims`)
//! 3. substitutions, in catalog execution order, one global pass each
//! 4. removals, in declaration order, one global pass each
//! 5. punctuation -> space
//! 6. whitespace collapse and trim
//! 7. lowercase
//!
//! Steps 1 and 2 run before any catalog rule sees the text. Punctuation is only
//! stripped after the catalog ran, because rules such as "w/o" need it literally.
//! No rule is ever re-applied to reach a fixed point.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;

use crate::catalog::RuleCatalog;
use crate::config::PipelineConfig;
use crate::rules::NormalizationRule;
use crate::trace::{Normalization, Recorder, Stage};

lazy_static! {
    static ref NUMERIC_GROUPING: Regex = Regex::new(r"(\d+?),(\d+?)").unwrap();
    // Case-sensitive: an upper-case "'S" is left for punctuation stripping.
    static ref POSSESSIVE: Regex = Regex::new(r"\b(\S+?)'(s)").unwrap();
}

/// Removes thousands separators embedded between digits.
pub fn strip_numeric_commas(text: &str) -> Cow<'_, str> {
    NUMERIC_GROUPING.replace_all(text, "${1}${2}")
}

/// Removes the apostrophe of a trailing `'s` attached to a token.
pub fn strip_possessives(text: &str) -> Cow<'_, str> {
    POSSESSIVE.replace_all(text, "${1}${2}")
}

/// Collapses whitespace runs to one space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Applies the fixed pre-processing steps, a catalog, and finalization.
///
/// The pipeline holds configuration only. It keeps no state between calls and
/// can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct NormalizationPipeline {
    config: PipelineConfig,
    punctuation: HashSet<char>,
}

impl Default for NormalizationPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl NormalizationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let punctuation = config.punctuation.chars().collect();
        Self { config, punctuation }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes `raw` against `catalog`. Absent input yields the empty string.
    pub fn run(&self, raw: Option<&str>, catalog: &RuleCatalog) -> String {
        match raw {
            Some(raw) => self.execute(raw, catalog, &mut Recorder::disabled()),
            None => String::new(),
        }
    }

    /// Like [`run`](Self::run), but records every step that changed the text.
    pub fn explain(&self, raw: Option<&str>, catalog: &RuleCatalog) -> Normalization {
        let Some(raw) = raw else {
            return Normalization::default();
        };
        let mut recorder = Recorder::enabled();
        let output = self.execute(raw, catalog, &mut recorder);
        Normalization {
            input: Some(raw.to_string()),
            output,
            events: recorder.into_events(),
        }
    }

    /// Replaces every configured punctuation character with a space.
    pub fn strip_punctuation<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.chars().any(|c| self.punctuation.contains(&c)) {
            return Cow::Borrowed(text);
        }
        Cow::Owned(
            text.chars()
                .map(|c| if self.punctuation.contains(&c) { ' ' } else { c })
                .collect(),
        )
    }

    fn execute(&self, raw: &str, catalog: &RuleCatalog, recorder: &mut Recorder) -> String {
        let mut text = raw.to_string();

        if self.config.numeric_comma_removal {
            text = rewrite(text, Stage::NumericRegrouping, None, recorder, strip_numeric_commas);
        }
        if self.config.possessive_stripping {
            text = rewrite(text, Stage::PossessiveStripping, None, recorder, strip_possessives);
        }

        for rule in catalog.substitutions() {
            text = rewrite(text, Stage::Substitution, Some(rule.description()), recorder, |t| rule.apply(t));
        }
        for rule in catalog.removals() {
            text = rewrite(text, Stage::Removal, Some(rule.description()), recorder, |t| rule.apply(t));
        }

        text = rewrite(text, Stage::Punctuation, None, recorder, |t| self.strip_punctuation(t));
        text = rewrite(text, Stage::Whitespace, None, recorder, |t| Cow::Owned(collapse_whitespace(t)));
        rewrite(text, Stage::CaseFolding, None, recorder, |t| Cow::Owned(t.to_lowercase()))
    }
}

/// Runs one step over `text`, reusing the buffer when the step matched nothing.
fn rewrite<F>(text: String, stage: Stage, rule: Option<&str>, recorder: &mut Recorder, step: F) -> String
where
    F: for<'t> Fn(&'t str) -> Cow<'t, str>,
{
    let replaced = match step(&text) {
        Cow::Owned(next) => Some(next),
        Cow::Borrowed(_) => None,
    };
    match replaced {
        Some(next) => {
            if recorder.is_enabled() && next != text {
                recorder.record(stage, rule, &text, &next);
            }
            next
        }
        None => text,
    }
}
