//! B001 — mutable default argument.
//!
//! `def f(items=[]):` shares one list instance across every call that
//! doesn't pass `items` explicitly. Flags any `list`, `dict`, or `set`
//! literal used as a parameter default.

use rustpython_ast::{Arguments, Expr, Stmt};

use crate::locator::Locator;
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "B001";

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let mut findings = Vec::new();
    for stmt in crate::python::ast_ext::walk_stmts(ctx.body) {
        let args = match stmt {
            Stmt::FunctionDef(s) => &s.args,
            Stmt::AsyncFunctionDef(s) => &s.args,
            _ => continue,
        };
        for default in mutable_defaults(args) {
            let (line, column) = locator.start_line_column(default);
            findings.push(
                Finding::new(
                    ID,
                    "Mutable default argument detected. Use None and initialize inside the function.",
                    Severity::Medium,
                    ctx.filename,
                    line,
                    column,
                )
                .with_suggestion("Change default to None and set it to [] inside the function."),
            );
        }
    }
    findings
}

fn mutable_defaults(args: &Arguments) -> Vec<&Expr> {
    args.posonlyargs
        .iter()
        .chain(args.args.iter())
        .chain(args.kwonlyargs.iter())
        .filter_map(|arg| arg.default.as_deref())
        .filter(|default| matches!(default, Expr::List(_) | Expr::Dict(_) | Expr::Set(_)))
        .collect()
}
