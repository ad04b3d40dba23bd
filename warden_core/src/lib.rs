//! Warden analysis core: rule registry, configuration, file discovery,
//! parallel scanning, and baseline-filtered findings for a Python-like
//! source language.
//!
//! This crate is the library half of `warden`; the `warden` binary is a
//! thin CLI shell around [`run_scan`].

pub mod baseline;
pub mod config;
pub mod engine;
pub mod locator;
pub mod python;
pub mod registry;
pub mod reporter;
pub mod types;
pub mod walker;

use std::path::Path;

use baseline::{Baseline, BaselineError};
use config::Config;
use registry::RuleRegistry;
use types::Finding;
use walker::WalkError;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error(transparent)]
    Baseline(#[from] BaselineError),
}

/// Build the registry of every rule this crate ships for its supported
/// language.
#[must_use]
pub fn default_registry() -> RuleRegistry {
    python::rules::build_python_rules()
}

/// Discover files under `root`, scan them, and apply `baseline` (if any)
/// to the result — the full pipeline behind the `check` CLI verb.
pub fn run_scan(
    root: &Path,
    registry: &RuleRegistry,
    config: &Config,
    baseline: Option<&Baseline>,
) -> Result<Vec<Finding>, ScanError> {
    let files = walker::discover(root, config)?;
    let findings = engine::scan(&files, registry, config);
    Ok(match baseline {
        Some(baseline) => baseline.filter(findings),
        None => findings,
    })
}
