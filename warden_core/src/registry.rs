//! Rule registry — an explicit, ordinary value rather than a hidden
//! mutable singleton.
//!
//! [`RuleRegistry`] is built once at startup and passed by shared
//! reference into the scanner and every worker. Rules are functions, not
//! objects with virtual dispatch; looking one up is a hash-map lookup,
//! not a vtable call.

use std::collections::HashMap;

use crate::types::{Finding, RuleContext, Severity};

/// A rule's check function: consumes a [`RuleContext`] and returns zero or
/// more findings. Rules are plain `fn` pointers — they carry no state of
/// their own, so registering the same rule from multiple threads (which
/// never happens; see module docs) would still be trivially safe.
pub type RuleFn = fn(&RuleContext) -> Vec<Finding>;

/// A registered rule: stable id, human description, default severity, the
/// language it applies to, and its check function.
///
/// Constructed once per rule at registry build time and never mutated.
#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    pub id: &'static str,
    pub description: &'static str,
    pub default_severity: Severity,
    pub language_tag: &'static str,
    pub check: RuleFn,
}

impl std::fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("default_severity", &self.default_severity)
            .field("language_tag", &self.language_tag)
            .finish_non_exhaustive()
    }
}

/// Process-wide mapping from rule id to descriptor, built once before any
/// scan starts.
///
/// # Thread safety
///
/// `RuleRegistry` is `Sync` by construction (it is immutable data plus
/// `fn` pointers) but callers must not call [`RuleRegistry::register`]
/// concurrently with, or after, dispatching any scan. The scheduler only
/// ever takes `&RuleRegistry` — registration is a precondition the
/// caller enforces by construction, not something this type polices at
/// runtime.
#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
    order: Vec<String>,
    rules: HashMap<String, RuleDescriptor>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Idempotent per id: registering the same id twice
    /// replaces the descriptor in place without disturbing insertion
    /// order, which test harnesses rely on to substitute a rule with a
    /// stub.
    pub fn register(&mut self, descriptor: RuleDescriptor) {
        let id = descriptor.id.to_owned();
        if !self.rules.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.rules.insert(id, descriptor);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RuleDescriptor> {
        self.rules.get(id)
    }

    /// All rules registered for the given language tag, in the order they
    /// were first registered.
    #[must_use]
    pub fn rules_for_language(&self, language_tag: &str) -> Vec<&RuleDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.rules.get(id))
            .filter(|rule| rule.language_tag == language_tag)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: &RuleContext) -> Vec<Finding> {
        Vec::new()
    }

    #[test]
    fn registration_is_insertion_order_stable() {
        let mut reg = RuleRegistry::new();
        reg.register(RuleDescriptor {
            id: "B002",
            description: "second",
            default_severity: Severity::High,
            language_tag: "python",
            check: noop,
        });
        reg.register(RuleDescriptor {
            id: "B001",
            description: "first",
            default_severity: Severity::Medium,
            language_tag: "python",
            check: noop,
        });
        let ids: Vec<_> = reg
            .rules_for_language("python")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["B002", "B001"]);
    }

    #[test]
    fn re_registering_same_id_replaces_without_moving() {
        let mut reg = RuleRegistry::new();
        reg.register(RuleDescriptor {
            id: "B001",
            description: "original",
            default_severity: Severity::Medium,
            language_tag: "python",
            check: noop,
        });
        reg.register(RuleDescriptor {
            id: "B002",
            description: "other",
            default_severity: Severity::Low,
            language_tag: "python",
            check: noop,
        });
        reg.register(RuleDescriptor {
            id: "B001",
            description: "replaced",
            default_severity: Severity::High,
            language_tag: "python",
            check: noop,
        });
        assert_eq!(reg.get("B001").unwrap().description, "replaced");
        let ids: Vec<_> = reg
            .rules_for_language("python")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["B001", "B002"], "order must be preserved");
    }

    #[test]
    fn filters_by_language_tag() {
        let mut reg = RuleRegistry::new();
        reg.register(RuleDescriptor {
            id: "B001",
            description: "py",
            default_severity: Severity::Medium,
            language_tag: "python",
            check: noop,
        });
        reg.register(RuleDescriptor {
            id: "R001",
            description: "rust",
            default_severity: Severity::Medium,
            language_tag: "rust",
            check: noop,
        });
        assert_eq!(reg.rules_for_language("python").len(), 1);
        assert_eq!(reg.rules_for_language("ruby").len(), 0);
    }
}
