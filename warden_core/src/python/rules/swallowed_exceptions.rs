//! B002 — silently swallowed exception.
//!
//! A bare `except:` or `except Exception:` whose entire body is `pass`,
//! `...`, or nothing else discards whatever went wrong with no trace of
//! it ever having happened.

use rustpython_ast::{Constant, ExceptHandler, Expr, Stmt};

use crate::locator::Locator;
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "B002";

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let mut findings = Vec::new();
    for stmt in crate::python::ast_ext::walk_stmts(ctx.body) {
        let handlers = match stmt {
            Stmt::Try(s) => &s.handlers,
            Stmt::TryStar(s) => &s.handlers,
            _ => continue,
        };
        for handler in handlers {
            let ExceptHandler::ExceptHandler(handler) = handler;
            if !catches_broadly(handler.type_.as_deref()) {
                continue;
            }
            if !is_silent_body(&handler.body) {
                continue;
            }
            let (line, column) = locator.start_line_column(handler);
            findings.push(
                Finding::new(
                    ID,
                    "Silent exception swallowing. Log the error or handle it explicitly.",
                    Severity::High,
                    ctx.filename,
                    line,
                    column,
                )
                .with_suggestion("Add a logging statement or specific exception handling logic."),
            );
        }
    }
    findings
}

fn catches_broadly(exception_type: Option<&Expr>) -> bool {
    match exception_type {
        None => true,
        Some(Expr::Name(name)) => name.id.as_str() == "Exception",
        _ => false,
    }
}

fn is_silent_body(body: &[Stmt]) -> bool {
    let [only] = body else { return false };
    match only {
        Stmt::Pass(_) => true,
        Stmt::Expr(expr_stmt) => matches!(
            expr_stmt.value.as_ref(),
            Expr::Constant(c) if matches!(c.value, Constant::Ellipsis)
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::python::parse_module;
    use crate::types::RuleContext;

    #[test]
    fn flags_bare_except_pass() {
        let source = indoc! {"
            try:
                risky()
            except:
                pass
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn flags_except_exception_ellipsis() {
        let source = indoc! {"
            try:
                risky()
            except Exception:
                ...
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn logging_in_handler_is_not_flagged() {
        let source = indoc! {"
            try:
                risky()
            except Exception as e:
                log.error(e)
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn narrow_except_type_is_not_flagged() {
        let source = indoc! {"
            try:
                risky()
            except ValueError:
                pass
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }
}
