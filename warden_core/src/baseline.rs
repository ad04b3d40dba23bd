//! Baseline store — suppresses previously-accepted findings.
//!
//! A baseline is a set of fingerprints, each a stable hash of the fields
//! that identify a finding's *identity* (rule, file, line, message) rather
//! than its full record, so cosmetic changes elsewhere in a finding (for
//! example a severity override) don't break suppression. Fingerprinting
//! built the same way a content-addressable cache key is: sha2 over a
//! canonical string, hex-encoded.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::Finding;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("failed to read baseline file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse baseline file {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write baseline file {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct BaselineFile {
    fingerprints: Vec<String>,
}

/// A set of accepted-finding fingerprints.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    fingerprints: HashSet<String>,
}

impl Baseline {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a baseline from disk. A missing file is treated as an empty
    /// baseline — running with `--baseline` against a project that has
    /// never generated one suppresses nothing, rather than erroring.
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        if !path.exists() {
            return Ok(Self::empty());
        }
        let content = std::fs::read_to_string(path).map_err(|source| BaselineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: BaselineFile =
            serde_json::from_str(&content).map_err(|source| BaselineError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            fingerprints: parsed.fingerprints.into_iter().collect(),
        })
    }

    /// Write a baseline containing the fingerprint of every finding in
    /// `findings`, overwriting any existing file at `path`.
    pub fn save(path: &Path, findings: &[Finding]) -> Result<(), BaselineError> {
        let mut fingerprints: Vec<String> = findings.iter().map(fingerprint).collect();
        fingerprints.sort();
        fingerprints.dedup();
        let file = BaselineFile { fingerprints };
        let json = serde_json::to_string_pretty(&file).expect("BaselineFile serialization cannot fail");
        std::fs::write(path, json).map_err(|source| BaselineError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remove every finding whose fingerprint is already in this baseline,
    /// preserving the relative order of what remains.
    #[must_use]
    pub fn filter(&self, findings: Vec<Finding>) -> Vec<Finding> {
        findings
            .into_iter()
            .filter(|f| !self.fingerprints.contains(&fingerprint(f)))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

/// Stable identity hash over `(rule_id, file, line, message)`.
///
/// Severity and suggestion text are deliberately excluded: a baseline
/// entry should survive a severity-override config change or a rewritten
/// suggestion string for the same underlying issue.
fn fingerprint(finding: &Finding) -> String {
    let mut hasher = Sha256::new();
    hasher.update(finding.rule_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(finding.file.as_bytes());
    hasher.update(b"\0");
    hasher.update(finding.line.to_le_bytes());
    hasher.update(b"\0");
    hasher.update(finding.message.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn finding(rule_id: &str, file: &str, line: u32, message: &str) -> Finding {
        Finding::new(rule_id, message, Severity::Medium, file, line, 0)
    }

    #[test]
    fn missing_baseline_file_is_empty() {
        let baseline = Baseline::load(Path::new("/nonexistent/baseline.json")).unwrap();
        assert!(baseline.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let findings = vec![finding("B001", "a.py", 3, "mutable default")];
        Baseline::save(&path, &findings).unwrap();

        let baseline = Baseline::load(&path).unwrap();
        assert_eq!(baseline.len(), 1);
        assert!(baseline.filter(findings).is_empty());
    }

    #[test]
    fn filter_preserves_order_of_unsuppressed_findings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let suppressed = finding("B001", "a.py", 3, "mutable default");
        Baseline::save(&path, std::slice::from_ref(&suppressed)).unwrap();

        let baseline = Baseline::load(&path).unwrap();
        let kept_a = finding("B002", "a.py", 1, "bare except");
        let kept_b = finding("B003", "b.py", 5, "unclosed file");
        let findings = vec![kept_a.clone(), suppressed, kept_b.clone()];
        let remaining = baseline.filter(findings);
        assert_eq!(remaining, vec![kept_a, kept_b]);
    }

    #[test]
    fn severity_change_does_not_break_suppression() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let original = finding("B001", "a.py", 3, "mutable default");
        Baseline::save(&path, &[original]).unwrap();

        let baseline = Baseline::load(&path).unwrap();
        let reseverity =
            Finding::new("B001", "mutable default", Severity::High, "a.py", 3, 0);
        assert!(baseline.filter(vec![reseverity]).is_empty());
    }

    #[test]
    fn baseline_idempotent_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let findings = vec![
            finding("B001", "a.py", 3, "mutable default"),
            finding("L001", "a.py", 10, "infinite loop"),
        ];
        Baseline::save(&path, &findings).unwrap();
        let first = Baseline::load(&path).unwrap();
        Baseline::save(&path, &findings).unwrap();
        let second = Baseline::load(&path).unwrap();
        assert_eq!(first.len(), second.len());
    }
}
