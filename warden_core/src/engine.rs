//! Scheduler and per-file analyzer.
//!
//! The scheduler fans a list of discovered files out across a rayon
//! thread pool; each worker owns nothing but its own file's bytes for the
//! duration of the call, so there is no shared mutable state between
//! workers besides the read-only [`RuleRegistry`] and [`Config`]. A rule
//! panicking on one file is isolated with `catch_unwind` and logged —
//! it never aborts the rest of the scan.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use rayon::prelude::*;

use crate::config::Config;
use crate::registry::RuleRegistry;
use crate::types::{Finding, RuleContext};

const LANGUAGE: &str = "python";

/// Analyze every file in `paths`, in parallel, against `registry` and
/// `config`. Findings from different files may interleave in any order;
/// findings from the same file are contiguous and in the order the rules
/// that produced them ran (registration order).
#[must_use]
pub fn scan(paths: &[std::path::PathBuf], registry: &RuleRegistry, config: &Config) -> Vec<Finding> {
    paths
        .par_iter()
        .flat_map(|path| analyze_file(path, registry, config))
        .collect()
}

/// Analyze a single file: read it, parse it, and run every enabled rule
/// for its language against it.
///
/// A read failure or syntax error yields no findings rather than aborting
/// the file.
#[must_use]
pub fn analyze_file(path: &Path, registry: &RuleRegistry, config: &Config) -> Vec<Finding> {
    let filename = path.to_string_lossy();

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            log::warn!("Error reading {filename}: {err}");
            return Vec::new();
        }
    };

    let body = match crate::python::parse_module(&source, &filename) {
        Ok(body) => body,
        Err(_) => return Vec::new(),
    };

    let ctx = RuleContext::new(&filename, &body, &source);
    let mut findings = Vec::new();

    for rule in registry.rules_for_language(LANGUAGE) {
        if !config.is_rule_enabled(rule.id) {
            continue;
        }
        let outcome = catch_unwind(AssertUnwindSafe(|| (rule.check)(&ctx)));
        match outcome {
            Ok(results) => {
                let severity = config.effective_severity(rule.id, rule.default_severity);
                findings.extend(
                    results
                        .into_iter()
                        .map(|finding| finding.with_severity(severity)),
                );
            }
            Err(panic) => {
                let reason = panic_message(&panic);
                log::error!("Error running rule {} on {filename}: {reason}", rule.id);
            }
        }
    }

    findings
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
