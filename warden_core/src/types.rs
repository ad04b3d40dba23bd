//! Core type definitions for the Warden analysis core.
//!
//! These types form the contract between the scanner and the rule
//! implementations:
//!
//! - [`Severity`] is a totally ordered three-level scale.
//! - [`Finding`] is the immutable, file-anchored diagnostic every rule
//!   produces.
//! - [`RuleContext`] is the per-file state handed to every rule invocation.

use std::cell::RefCell;
use std::collections::HashMap;

use rustpython_ast::Stmt;
use serde::{Deserialize, Serialize};

/// Totally ordered severity scale: `LOW < MEDIUM < HIGH`.
///
/// Serializes as the uppercase variant name, matching the findings-output
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// A single, immutable diagnostic anchored to a file location.
///
/// Once constructed a `Finding` is never mutated in place; severity
/// overrides (applying a config's effective severity) replace the field by
/// building a new value via [`Finding::with_severity`].
///
/// Invariants: `line >= 1`, `rule_id` matches `^[A-Z][0-9]{3}$`. `column`
/// is 0-based and unconstrained beyond being a valid `u32`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub file: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl Finding {
    /// Construct a finding, enforcing the `rule_id` and `line` invariants.
    ///
    /// # Panics
    ///
    /// Panics if `rule_id` does not match `^[A-Z][0-9]{3}$` or `line == 0`.
    /// These are programmer errors inside a rule implementation, never
    /// something user input can trigger.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        let rule_id = rule_id.into();
        assert!(
            is_valid_rule_id(&rule_id),
            "rule_id {rule_id:?} does not match ^[A-Z][0-9]{{3}}$"
        );
        assert!(line >= 1, "finding line must be 1-based, got {line}");
        Self {
            rule_id,
            message: message.into(),
            severity,
            file: file.into(),
            line,
            column,
            suggestion: None,
            code_snippet: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(truncate_snippet(&snippet.into(), 200));
        self
    }

    /// Return a copy of this finding with `severity` replaced.
    ///
    /// Used by the per-file analyzer to apply the config's effective
    /// severity after a rule runs.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

fn is_valid_rule_id(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_uppercase() {
        return false;
    }
    let rest: Vec<char> = chars.collect();
    rest.len() == 3 && rest.iter().all(char::is_ascii_digit)
}

/// Truncate `s` to at most `max_chars` Unicode scalar values, preserving
/// grapheme boundaries so multi-byte code snippets never split mid-glyph.
fn truncate_snippet(s: &str, max_chars: usize) -> String {
    use unicode_segmentation::UnicodeSegmentation;

    let graphemes: Vec<&str> = s.graphemes(true).collect();
    if graphemes.len() <= max_chars {
        s.to_owned()
    } else {
        let mut out: String = graphemes[..max_chars].concat();
        out.push('\u{2026}');
        out
    }
}

/// Context passed to every rule invocation.
///
/// One context is constructed per file; it is never shared across files
/// or mutated by the scheduler once handed to a rule. `metadata` is
/// scratch space a rule may use to stash cross-invocation state for the
/// duration of a single file's analysis (for example, L003's pre-pass
/// guard-function table).
pub struct RuleContext<'a> {
    pub filename: &'a str,
    pub body: &'a [Stmt],
    pub source: &'a str,
    metadata: RefCell<HashMap<String, serde_json::Value>>,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub fn new(filename: &'a str, body: &'a [Stmt], source: &'a str) -> Self {
        Self {
            filename,
            body,
            source,
            metadata: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_metadata(&self, key: &str, value: serde_json::Value) {
        self.metadata.borrow_mut().insert(key.to_owned(), value);
    }

    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.metadata.borrow().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn severity_display_is_uppercase() {
        assert_eq!(Severity::High.to_string(), "HIGH");
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn finding_rejects_bad_rule_id() {
        Finding::new("bad", "msg", Severity::Low, "f.py", 1, 0);
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn finding_rejects_zero_line() {
        Finding::new("B001", "msg", Severity::Low, "f.py", 0, 0);
    }

    #[test]
    fn snippet_truncates_on_grapheme_boundary() {
        let long = "x".repeat(250);
        let f = Finding::new("B001", "m", Severity::Low, "f.py", 1, 0).with_snippet(long);
        assert!(f.code_snippet.unwrap().ends_with('\u{2026}'));
    }
}
