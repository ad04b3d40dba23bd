//! L001 — `while True` with no exit.
//!
//! A loop whose condition can never become false needs a `break`,
//! `return`, or `raise` somewhere in its body, or it never terminates.

use rustpython_ast::Stmt;

use crate::locator::Locator;
use crate::python::ast_ext::{is_always_true_literal, walk_stmts};
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "L001";

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let mut findings = Vec::new();
    for stmt in walk_stmts(ctx.body) {
        let Stmt::While(while_stmt) = stmt else {
            continue;
        };
        if !is_always_true_literal(&while_stmt.test) {
            continue;
        }
        if has_exit(&while_stmt.body) {
            continue;
        }
        let (line, column) = locator.start_line_column(while_stmt);
        findings.push(
            Finding::new(
                ID,
                "Potential infinite loop. 'while True' loop has no 'break', 'return', or 'raise'.",
                Severity::High,
                ctx.filename,
                line,
                column,
            )
            .with_suggestion("Add a break statement or a conditional exit."),
        );
    }
    findings
}

fn has_exit(body: &[Stmt]) -> bool {
    walk_stmts(body)
        .into_iter()
        .any(|stmt| matches!(stmt, Stmt::Break(_) | Stmt::Return(_) | Stmt::Raise(_)))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::python::parse_module;
    use crate::types::RuleContext;

    #[test]
    fn flags_while_true_with_no_exit() {
        let source = indoc! {"
            def loop():
                while True:
                    print('spin')
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn while_true_with_break_is_fine() {
        let source = indoc! {"
            def loop():
                while True:
                    if done():
                        break
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn while_1_literal_is_also_flagged() {
        let source = indoc! {"
            def loop():
                while 1:
                    print('spin')
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn conditional_while_is_not_flagged() {
        let source = indoc! {"
            def loop(n):
                while n > 0:
                    n -= 1
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }
}
