//! The seven Python rules and the registry that wires them up.

mod infinite_loop;
mod misleading_getters;
mod mutable_defaults;
mod null_deref;
mod sorted_unique;
mod swallowed_exceptions;
mod unclosed_file_handles;

use crate::registry::{RuleDescriptor, RuleRegistry};
use crate::types::Severity;

const LANGUAGE: &str = "python";

/// Build a registry containing every rule this crate ships: best-practice
/// rules first, then logic rules, then naming rules.
#[must_use]
pub fn build_python_rules() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(RuleDescriptor {
        id: mutable_defaults::ID,
        description: "Mutable default argument detected.",
        default_severity: Severity::Medium,
        language_tag: LANGUAGE,
        check: mutable_defaults::check,
    });
    registry.register(RuleDescriptor {
        id: swallowed_exceptions::ID,
        description: "Silent exception swallowing detected.",
        default_severity: Severity::High,
        language_tag: LANGUAGE,
        check: swallowed_exceptions::check,
    });
    registry.register(RuleDescriptor {
        id: unclosed_file_handles::ID,
        description: "Resource usage without proper cleanup (open without with).",
        default_severity: Severity::Medium,
        language_tag: LANGUAGE,
        check: unclosed_file_handles::check,
    });
    registry.register(RuleDescriptor {
        id: infinite_loop::ID,
        description: "Potential infinite loop.",
        default_severity: Severity::High,
        language_tag: LANGUAGE,
        check: infinite_loop::check,
    });
    registry.register(RuleDescriptor {
        id: sorted_unique::ID,
        description: "Functions claiming sorted/unique output without enforcing it.",
        default_severity: Severity::Low,
        language_tag: LANGUAGE,
        check: sorted_unique::check,
    });
    registry.register(RuleDescriptor {
        id: null_deref::ID,
        description: "Unchecked None dereference (control-flow aware).",
        default_severity: Severity::High,
        language_tag: LANGUAGE,
        check: null_deref::check,
    });
    registry.register(RuleDescriptor {
        id: misleading_getters::ID,
        description: "Misleading function name.",
        default_severity: Severity::Low,
        language_tag: LANGUAGE,
        check: misleading_getters::check,
    });
    registry
}
