//! Provides the data structures used to report what a normalization run did.
//!
//! A trace is only collected on request (`explain`); the plain `normalize`
//! path never allocates one.

use log::debug;
use serde::Serialize;
use std::fmt;

/// One step of the normalization pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NumericRegrouping,
    PossessiveStripping,
    Substitution,
    Removal,
    Punctuation,
    Whitespace,
    CaseFolding,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NumericRegrouping => "numeric_regrouping",
            Stage::PossessiveStripping => "possessive_stripping",
            Stage::Substitution => "substitution",
            Stage::Removal => "removal",
            Stage::Punctuation => "punctuation",
            Stage::Whitespace => "whitespace",
            Stage::CaseFolding => "case_folding",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step that changed the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    pub stage: Stage,
    /// The rule description for catalog stages; `None` for fixed pipeline steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub before: String,
    pub after: String,
}

/// The full result of an explained normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Normalization {
    /// `None` when the input was absent.
    pub input: Option<String>,
    pub output: String,
    pub events: Vec<TraceEvent>,
}

impl Normalization {
    /// Descriptions of the catalog rules that changed the text, in firing order.
    pub fn rules_fired(&self) -> Vec<&str> {
        self.events.iter().filter_map(|e| e.rule.as_deref()).collect()
    }

    pub fn fired(&self, description: &str) -> bool {
        self.rules_fired().contains(&description)
    }
}

/// Collects events when a trace was requested; a no-op otherwise.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    events: Option<Vec<TraceEvent>>,
}

impl Recorder {
    pub(crate) fn enabled() -> Self {
        Self { events: Some(Vec::new()) }
    }

    pub(crate) fn disabled() -> Self {
        Self { events: None }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.events.is_some()
    }

    pub(crate) fn record(&mut self, stage: Stage, rule: Option<&str>, before: &str, after: &str) {
        if let Some(events) = self.events.as_mut() {
            log_rule_firing(stage, rule, before, after);
            events.push(TraceEvent {
                stage,
                rule: rule.map(str::to_string),
                before: before.to_string(),
                after: after.to_string(),
            });
        }
    }

    pub(crate) fn into_events(self) -> Vec<TraceEvent> {
        self.events.unwrap_or_default()
    }
}

pub fn log_rule_firing(stage: Stage, rule: Option<&str>, before: &str, after: &str) {
    debug!(
        target: "offense_norm_core::pipeline",
        "{} rule '{}': '{}' -> '{}'",
        stage,
        rule.unwrap_or("-"),
        before,
        after
    );
}
