//! B003 — resource usage without cleanup.
//!
//! `f = open(path)` leaks the handle unless something closes it; `with
//! open(path) as f:` guarantees cleanup. This rule flags every `open(...)`
//! call that is not itself the context expression of a `with` item —
//! nested `open()` calls inside a `with` body are still flagged, since the
//! `with` only makes the *outer* call safe.

use rustpython_ast::Stmt;

use crate::locator::Locator;
use crate::python::ast_ext::{self, walk_all_exprs};
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "B003";

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let safe = safe_open_calls(ctx.body);

    let mut findings = Vec::new();
    for expr in walk_all_exprs(ctx.body) {
        if !ast_ext::is_name_call(expr, "open") {
            continue;
        }
        if safe.iter().any(|s| std::ptr::eq(*s, expr)) {
            continue;
        }
        let (line, column) = locator.start_line_column(expr);
        findings.push(
            Finding::new(
                ID,
                "Resource usage without context manager. Use 'with open(...)' to ensure cleanup.",
                Severity::Medium,
                ctx.filename,
                line,
                column,
            )
            .with_suggestion("Wrap the open() call in a 'with' statement."),
        );
    }
    findings
}

/// Every `open(...)` call that appears directly in a `with` item's context
/// expression, anywhere in the tree (including nested `with` statements).
fn safe_open_calls(stmts: &[Stmt]) -> Vec<&rustpython_ast::Expr> {
    let mut safe = Vec::new();
    for stmt in ast_ext::walk_stmts(stmts) {
        let items = match stmt {
            Stmt::With(s) => &s.items,
            Stmt::AsyncWith(s) => &s.items,
            _ => continue,
        };
        for item in items {
            for expr in ast_ext::walk_exprs(&item.context_expr) {
                if ast_ext::is_name_call(expr, "open") {
                    safe.push(expr);
                }
            }
        }
    }
    safe
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::python::parse_module;
    use crate::types::RuleContext;

    #[test]
    fn flags_bare_open_assignment() {
        let source = indoc! {"
            def read(path):
                f = open(path)
                return f.read()
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn with_open_is_not_flagged() {
        let source = indoc! {"
            def read(path):
                with open(path) as f:
                    return f.read()
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn nested_open_inside_with_body_is_still_flagged() {
        let source = indoc! {"
            def read(path, other):
                with open(path) as f:
                    g = open(other)
                    return f.read() + g.read()
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }
}
