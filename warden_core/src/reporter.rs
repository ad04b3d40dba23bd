//! Output formatting for scan results.

use crate::types::Finding;

/// Render findings as a JSON array, each element carrying `rule_id`,
/// `message`, `severity`, `file`, `line`, `column`, and the optional
/// `suggestion`/`code_snippet`.
///
/// # Panics
///
/// Panics if a `Finding` somehow fails to serialize — every field is a
/// plain string, enum, or number, so this cannot happen in practice.
#[must_use]
pub fn to_json(findings: &[Finding]) -> String {
    serde_json::to_string_pretty(findings).expect("Finding serialization cannot fail")
}

/// Render findings as plain, aligned text rows for the non-`--json` CLI
/// path: `file:line:column rule_id [severity] message`, followed by the
/// suggestion on an indented line when present.
#[must_use]
pub fn to_table(findings: &[Finding]) -> String {
    let mut out = String::new();
    for finding in findings {
        out.push_str(&format!(
            "{}:{}:{} {} [{}] {}\n",
            finding.file, finding.line, finding.column, finding.rule_id, finding.severity, finding.message
        ));
        if let Some(suggestion) = &finding.suggestion {
            out.push_str(&format!("    suggestion: {suggestion}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn json_omits_absent_optional_fields() {
        let findings = vec![Finding::new("B001", "msg", Severity::Medium, "f.py", 1, 0)];
        let json = to_json(&findings);
        assert!(!json.contains("suggestion"));
        assert!(!json.contains("code_snippet"));
    }

    #[test]
    fn json_includes_present_optional_fields() {
        let findings = vec![
            Finding::new("B001", "msg", Severity::Medium, "f.py", 1, 0).with_suggestion("fix it"),
        ];
        let json = to_json(&findings);
        assert!(json.contains("\"suggestion\""));
    }

    #[test]
    fn table_renders_one_row_per_finding() {
        let findings = vec![
            Finding::new("B001", "mutable default", Severity::Medium, "f.py", 3, 10)
                .with_suggestion("use None"),
        ];
        let table = to_table(&findings);
        assert!(table.contains("f.py:3:10 B001 [MEDIUM] mutable default"));
        assert!(table.contains("suggestion: use None"));
    }
}
