//! N001 — a `get_*` function that never returns a value.
//!
//! Callers read a `get_`-prefixed name as "fetches and hands back a
//! value". A body with no `return <expr>` anywhere breaks that contract —
//! unless the function is a bodyless abstract stub (`pass` or a single
//! expression statement, e.g. a docstring), which this rule leaves alone.

use rustpython_ast::Stmt;

use crate::locator::Locator;
use crate::python::ast_ext::walk_stmts;
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "N001";

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let mut findings = Vec::new();
    for stmt in walk_stmts(ctx.body) {
        let (name, body) = match stmt {
            Stmt::FunctionDef(s) => (s.name.as_str(), &s.body),
            Stmt::AsyncFunctionDef(s) => (s.name.as_str(), &s.body),
            _ => continue,
        };
        if !name.to_lowercase().starts_with("get_") {
            continue;
        }
        if has_value_returning_return(body) || is_abstract_stub(body) {
            continue;
        }
        let (line, column) = locator.start_line_column(stmt);
        findings.push(Finding::new(
            ID,
            format!("Function '{name}' starts with 'get_' but does not return a value."),
            Severity::Low,
            ctx.filename,
            line,
            column,
        ));
    }
    findings
}

fn has_value_returning_return(body: &[Stmt]) -> bool {
    walk_stmts(body)
        .into_iter()
        .any(|stmt| matches!(stmt, Stmt::Return(r) if r.value.is_some()))
}

fn is_abstract_stub(body: &[Stmt]) -> bool {
    matches!(body, [Stmt::Pass(_)] | [Stmt::Expr(_)])
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::python::parse_module;
    use crate::types::RuleContext;

    #[test]
    fn getter_with_no_return_is_flagged() {
        let source = indoc! {"
            def get_name(self):
                print(self.name)
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn getter_with_return_is_fine() {
        let source = indoc! {"
            def get_name(self):
                return self.name
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn abstract_stub_is_not_flagged() {
        let source = indoc! {"
            def get_name(self):
                \"\"\"Subclasses implement this.\"\"\"
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn non_getter_name_is_ignored() {
        let source = indoc! {"
            def compute(self):
                pass
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }
}
