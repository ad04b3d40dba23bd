//! Per-rule configuration and path exclusion.
//!
//! The interesting, fully specified surface is the resulting option set
//! and the per-rule value-shape recognition rules below. [`Config::from_raw`]
//! is that surface; [`Config::load`] is a thin convenience wrapper that
//! performs the actual file read and YAML deserialization, treating any
//! failure as non-fatal.

use std::collections::HashMap;
use std::path::Path;

use globset::{Glob, GlobSetBuilder};

use crate::types::Severity;

/// Per-rule override: enabled/disabled plus an optional severity override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub enabled: bool,
    pub severity_override: Option<Severity>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity_override: None,
        }
    }
}

/// Top-level configuration: per-rule overrides plus an ordered list of
/// path-exclusion globs.
///
/// Built once at process start and treated as read-only thereafter — the
/// same value is shared by reference across every worker in the scheduler
/// pool.
#[derive(Debug, Clone, Default)]
pub struct Config {
    rules: HashMap<String, RuleConfig>,
    exclude: Vec<String>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when the rule is absent from the config (defaults to
    /// enabled) or explicitly enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        self.rules.get(id).map_or(true, |r| r.enabled)
    }

    /// The override severity if one is configured for `id`, else
    /// `default`.
    #[must_use]
    pub fn effective_severity(&self, id: &str, default: Severity) -> Severity {
        self.rules
            .get(id)
            .and_then(|r| r.severity_override)
            .unwrap_or(default)
    }

    /// Shell-style glob matching (`*`, `?`, `[..]`) against the full path
    /// string, with `/**/` matching zero or more path components. `true`
    /// if `path` matches any configured exclude pattern.
    #[must_use]
    pub fn is_path_excluded(&self, path: &str) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        match builder.build() {
            Ok(set) => set.is_match(path),
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn rule_config(&self, id: &str) -> Option<&RuleConfig> {
        self.rules.get(id)
    }

    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude
    }

    /// Build a `Config` from an already-deserialized raw YAML value.
    /// Unknown severities silently degrade to "no override"; malformed
    /// per-rule shapes are simply skipped (a loader error is non-fatal,
    /// not a reason to fail the whole config).
    #[must_use]
    pub fn from_raw(raw: &serde_yaml::Value) -> Self {
        let mut config = Self::new();

        if let Some(rules) = raw.get("rules").and_then(serde_yaml::Value::as_mapping) {
            for (key, value) in rules {
                let Some(id) = key.as_str() else { continue };
                config.rules.insert(id.to_owned(), parse_rule_value(value));
            }
        }

        if let Some(exclude) = raw.get("exclude").and_then(serde_yaml::Value::as_sequence) {
            config.exclude = exclude
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect();
        }

        config
    }

    /// Load configuration from a YAML file on disk.
    ///
    /// A missing or malformed file yields a default (empty) config; the
    /// caller is expected to have already logged a warning via
    /// [`log::warn!`] — see [`load_with_warning`].
    #[must_use]
    pub fn load(path: &Path) -> Self {
        load_with_warning(path).unwrap_or_default()
    }
}

/// Read and parse `path` as YAML, logging (not returning) any failure.
///
/// Prints `"Warning: Failed to load config from {path}: {e}"` and falls
/// back to defaults rather than propagating the error.
fn load_with_warning(path: &Path) -> Option<Config> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            if path.exists() {
                log::warn!(
                    "Warning: Failed to load config from {}: {err}",
                    path.display()
                );
            }
            return None;
        }
    };
    match serde_yaml::from_str::<serde_yaml::Value>(&content) {
        Ok(raw) => Some(Config::from_raw(&raw)),
        Err(err) => {
            log::warn!(
                "Warning: Failed to load config from {}: {err}",
                path.display()
            );
            None
        }
    }
}

/// Recognize the four per-rule value shapes:
/// - the literal string `"OFF"` → disabled
/// - a severity name → enabled, with that severity override
/// - a boolean → enabled/disabled as given
/// - a mapping `{enabled, severity}` → both fields, independently optional
fn parse_rule_value(value: &serde_yaml::Value) -> RuleConfig {
    match value {
        serde_yaml::Value::String(s) => {
            if s.eq_ignore_ascii_case("off") {
                RuleConfig {
                    enabled: false,
                    severity_override: None,
                }
            } else {
                RuleConfig {
                    enabled: true,
                    severity_override: s.parse().ok(),
                }
            }
        }
        serde_yaml::Value::Bool(b) => RuleConfig {
            enabled: *b,
            severity_override: None,
        },
        serde_yaml::Value::Mapping(map) => {
            let mut cfg = RuleConfig::default();
            if let Some(serde_yaml::Value::Bool(b)) = map.get("enabled") {
                cfg.enabled = *b;
            }
            if let Some(serde_yaml::Value::String(s)) = map.get("severity") {
                cfg.severity_override = s.parse().ok();
            }
            cfg
        }
        _ => RuleConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn off_literal_disables_rule() {
        let config = Config::from_raw(&raw("rules:\n  B001: OFF\n"));
        assert!(!config.is_rule_enabled("B001"));
    }

    #[test]
    fn severity_name_enables_with_override() {
        let config = Config::from_raw(&raw("rules:\n  B001: HIGH\n"));
        assert!(config.is_rule_enabled("B001"));
        assert_eq!(
            config.effective_severity("B001", Severity::Low),
            Severity::High
        );
    }

    #[test]
    fn boolean_shape_toggles_enabled() {
        let config = Config::from_raw(&raw("rules:\n  B001: false\n"));
        assert!(!config.is_rule_enabled("B001"));
    }

    #[test]
    fn mapping_shape_sets_both_fields() {
        let config = Config::from_raw(&raw("rules:\n  B001:\n    enabled: true\n    severity: MEDIUM\n"));
        assert!(config.is_rule_enabled("B001"));
        assert_eq!(
            config.effective_severity("B001", Severity::Low),
            Severity::Medium
        );
    }

    #[test]
    fn unknown_severity_degrades_to_no_override() {
        let config = Config::from_raw(&raw("rules:\n  B001: EXTREME\n"));
        assert!(config.is_rule_enabled("B001"));
        assert_eq!(
            config.effective_severity("B001", Severity::Low),
            Severity::Low
        );
    }

    #[test]
    fn absent_rule_defaults_to_enabled_and_no_override() {
        let config = Config::new();
        assert!(config.is_rule_enabled("B999"));
        assert_eq!(
            config.effective_severity("B999", Severity::Medium),
            Severity::Medium
        );
    }

    #[test]
    fn exclude_globs_match_full_path() {
        let config = Config::from_raw(&raw("exclude:\n  - \"**/tests/**\"\n  - \"vendor/*.py\"\n"));
        assert!(config.is_path_excluded("src/tests/foo.py"));
        assert!(config.is_path_excluded("vendor/lib.py"));
        assert!(!config.is_path_excluded("src/app.py"));
    }

    #[test]
    fn missing_config_file_yields_empty_config() {
        let config = Config::load(Path::new("/nonexistent/path/does-not-exist.yaml"));
        assert!(config.is_rule_enabled("B001"));
        assert!(config.exclude_patterns().is_empty());
    }

    #[test]
    fn malformed_config_file_is_non_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "not: [valid: yaml: at all").unwrap();
        let config = Config::load(&path);
        assert!(config.is_rule_enabled("B001"));
    }
}
