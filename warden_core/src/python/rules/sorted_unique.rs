//! L002 — function name promises sorted/unique output it never delivers.
//!
//! A function named `get_sorted_users` or `unique_ids` that never calls
//! `sorted`/`.sort()` (for "sorted") or one of `set`/`unique`/`distinct`/
//! `uuid4`/`sha256`/`md5` (for "unique") anywhere in its body is promising
//! something its implementation doesn't keep — at least not visibly to
//! this scan, which doesn't chase the promise across a called helper. A
//! composite identifier built from an f-string with at least two
//! substitutions, or a `+`-concatenation touching at least two distinct
//! name/attribute references, also counts as uniqueness evidence: both
//! are common ways to hand-assemble a unique key without calling out to
//! any of the named helpers.

use rustpython_ast::{Expr, Operator, Stmt};

use crate::locator::Locator;
use crate::python::ast_ext::{call_attr, call_name, walk_all_exprs, walk_stmts};
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "L002";

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let mut findings = Vec::new();
    for stmt in walk_stmts(ctx.body) {
        let (name, body) = match stmt {
            Stmt::FunctionDef(s) => (s.name.as_str(), &s.body),
            Stmt::AsyncFunctionDef(s) => (s.name.as_str(), &s.body),
            _ => continue,
        };
        let lower = name.to_lowercase();
        let claims_sorted = lower.contains("sorted");
        let claims_unique = lower.contains("unique");
        if !claims_sorted && !claims_unique {
            continue;
        }
        if promise_kept(body, claims_sorted, claims_unique) {
            continue;
        }
        let (line, column) = locator.start_line_column(stmt);
        let promise = if claims_sorted { "sorted" } else { "unique" };
        findings.push(
            Finding::new(
                ID,
                format!(
                    "Function '{name}' seems to promise {promise} results but logic was not found."
                ),
                Severity::Low,
                ctx.filename,
                line,
                column,
            )
            .with_suggestion(format!(
                "Implement {} logic explicitly.",
                if claims_sorted { "sorting" } else { "uniqueness" }
            )),
        );
    }
    findings
}

fn promise_kept(body: &[Stmt], claims_sorted: bool, claims_unique: bool) -> bool {
    for expr in walk_all_exprs(body) {
        if claims_sorted
            && (matches!(call_name(expr), Some("sorted" | "sort"))
                || matches!(call_attr(expr), Some("sort")))
        {
            return true;
        }
        if claims_unique {
            let calls_unique_helper = matches!(
                call_name(expr),
                Some("set" | "unique" | "distinct" | "uuid4" | "sha256" | "md5")
            ) || matches!(call_attr(expr), Some("unique" | "distinct"));
            if calls_unique_helper || composite_identifier_evidence(expr) {
                return true;
            }
        }
    }
    false
}

/// Evidence of a hand-assembled composite identifier: an f-string with at
/// least two substitutions, or a `+`-concatenation touching at least two
/// distinct name/attribute references.
fn composite_identifier_evidence(expr: &Expr) -> bool {
    match expr {
        Expr::JoinedStr(joined) => {
            joined
                .values
                .iter()
                .filter(|value| matches!(value, Expr::FormattedValue(_)))
                .count()
                >= 2
        }
        Expr::BinOp(bin_op) if matches!(bin_op.op, Operator::Add) => {
            count_name_or_attribute_refs(expr) >= 2
        }
        _ => false,
    }
}

/// Flatten a chain of `+` operands (`a + b + c` is one chain of three, not
/// a nested tree) and count how many of them are themselves a bare name
/// or attribute reference — `user.id` counts once, not once per node on
/// its own attribute-access chain.
fn count_name_or_attribute_refs(expr: &Expr) -> usize {
    add_chain_operands(expr)
        .into_iter()
        .filter(|operand| matches!(operand, Expr::Name(_) | Expr::Attribute(_)))
        .count()
}

fn add_chain_operands(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::BinOp(bin_op) if matches!(bin_op.op, Operator::Add) => {
            let mut operands = add_chain_operands(&bin_op.left);
            operands.extend(add_chain_operands(&bin_op.right));
            operands
        }
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::python::parse_module;
    use crate::types::RuleContext;

    #[test]
    fn unfulfilled_sorted_promise_is_flagged() {
        let source = indoc! {"
            def get_sorted_users(users):
                return users
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }

    #[test]
    fn sorted_call_satisfies_the_promise() {
        let source = indoc! {"
            def get_sorted_users(users):
                return sorted(users)
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn unique_promise_checks_set_and_distinct() {
        let source = indoc! {"
            def unique_ids(ids):
                return list(set(ids))
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn unrelated_function_name_is_ignored() {
        let source = indoc! {"
            def process(items):
                return items
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn unique_promise_checks_uuid4_sha256_and_md5() {
        for call in ["uuid4()", "sha256(data)", "md5(data)"] {
            let source = format!("def unique_id(data):\n    return {call}\n");
            let body = parse_module(&source, "f.py").unwrap();
            let ctx = RuleContext::new("f.py", &body, &source);
            assert!(super::check(&ctx).is_empty(), "{call} should satisfy the promise");
        }
    }

    #[test]
    fn unique_promise_checks_distinct_method_call() {
        let source = indoc! {"
            def unique_rows(query):
                return query.distinct()
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn composite_fstring_with_two_substitutions_satisfies_unique_promise() {
        let source = indoc! {"
            def unique_key(user, session):
                return f'{user.id}-{session.id}'
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn composite_concatenation_of_two_references_satisfies_unique_promise() {
        let source = indoc! {"
            def unique_key(user, session):
                return user.id + session.id
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert!(super::check(&ctx).is_empty());
    }

    #[test]
    fn single_reference_concatenation_does_not_satisfy_unique_promise() {
        let source = indoc! {"
            def unique_key(user):
                return user.id + '-suffix'
        "};
        let body = parse_module(source, "f.py").unwrap();
        let ctx = RuleContext::new("f.py", &body, source);
        assert_eq!(super::check(&ctx).len(), 1);
    }
}
