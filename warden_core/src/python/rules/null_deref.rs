//! L003 — flow-sensitive `None` dereference.
//!
//! Tracks, per function, the set of local names currently known to hold
//! `None` as control flow moves sequentially through a block. A guard
//! recognized on a dangerous name narrows that set for the branch its
//! truth implies; an early-terminating guard body narrows it for the
//! statements that follow too. Loops and `try` bodies are scanned with
//! the incoming state, without trying to model how many times they run.
//!
//! Recognized guard forms (for both `if` tests and `assert` tests):
//! `x is None` / `x is not None`, bare `x` (truthy) / `not x`, and
//! `isinstance(x, T)` / `hasattr(x, ...)`. A pre-pass also recognizes
//! functions whose own first statement is one of these guards on a
//! parameter and terminates the function on failure — calling such a
//! function elsewhere in the file narrows its guarded argument the same
//! way the inline guard would.
//!
//! Dereferences of dunder attributes (`x.__class__`) are never flagged —
//! they are safe to access even when `x` is `None`. Short-circuit
//! boolean expressions (`x is not None and x.attr`) narrow later
//! operands the way Python itself would evaluate them.

use std::collections::{HashMap, HashSet};

use rustpython_ast::{
    Arguments, BoolOp as AstBoolOp, CmpOp, Expr, ExprAttribute, ExprSubscript, Stmt, StmtIf,
    UnaryOp as AstUnaryOp,
};

use crate::locator::Locator;
use crate::python::ast_ext::{expr_children, is_none_literal};
use crate::types::{Finding, RuleContext, Severity};

pub const ID: &str = "L003";

/// Maps a guard function's name to the positional-argument indices it
/// establishes as non-null (or null) on successful return.
type GuardTable<'a> = HashMap<&'a str, HashSet<usize>>;

pub fn check(ctx: &RuleContext) -> Vec<Finding> {
    let locator = Locator::new(ctx.source);
    let guard_table = build_guard_table(ctx.body);
    let mut findings = Vec::new();
    for stmt in ctx.body {
        let body = match stmt {
            Stmt::FunctionDef(f) => &f.body,
            Stmt::AsyncFunctionDef(f) => &f.body,
            _ => continue,
        };
        scan_block(body, &HashSet::new(), &guard_table, ctx, &locator, &mut findings);
    }
    findings
}

/// Scan every top-level function definition for a leading guard clause on
/// one of its own parameters that terminates the function when the guard
/// fails, and record `(function_name -> {parameter_index})` for each one
/// found. Calls to these functions elsewhere act like inline guards.
fn build_guard_table(body: &[Stmt]) -> GuardTable<'_> {
    let mut table: GuardTable = HashMap::new();
    for stmt in body {
        let (name, args, fbody) = match stmt {
            Stmt::FunctionDef(f) => (f.name.as_str(), f.args.as_ref(), f.body.as_slice()),
            Stmt::AsyncFunctionDef(f) => (f.name.as_str(), f.args.as_ref(), f.body.as_slice()),
            _ => continue,
        };
        let Some(first) = fbody.first() else { continue };
        let guarded_var = match first {
            Stmt::If(if_stmt) => analyze_guard(&if_stmt.test)
                .filter(|_| block_terminates(&if_stmt.body))
                .map(|(var, _)| var),
            Stmt::Assert(a) => analyze_guard(&a.test).map(|(var, _)| var),
            _ => None,
        };
        let Some(var) = guarded_var else { continue };
        if let Some(index) = param_index(args, var) {
            table.entry(name).or_default().insert(index);
        }
    }
    table
}

fn param_index(args: &Arguments, var: &str) -> Option<usize> {
    args.posonlyargs
        .iter()
        .chain(args.args.iter())
        .position(|arg| arg.def.arg.as_str() == var)
}

/// Scan `stmts` sequentially, threading a set of names currently known to
/// be `None` through assignments, guards, and nested blocks.
fn scan_block<'a>(
    stmts: &'a [Stmt],
    incoming: &HashSet<&'a str>,
    guard_table: &GuardTable<'a>,
    ctx: &RuleContext,
    locator: &Locator,
    findings: &mut Vec<Finding>,
) {
    let mut dangerous: HashSet<&'a str> = incoming.clone();

    for stmt in stmts {
        update_from_assignment(stmt, &mut dangerous);
        check_dereference(stmt, &dangerous, ctx, locator, findings);

        match stmt {
            Stmt::If(if_stmt) => {
                handle_if(if_stmt, &mut dangerous, guard_table, ctx, locator, findings);
            }
            Stmt::Assert(a) => {
                if let Some((var, is_null_check)) = analyze_guard(&a.test) {
                    if !is_null_check {
                        dangerous.remove(var);
                    }
                }
            }
            Stmt::Expr(e) => {
                apply_guard_call(&e.value, guard_table, &mut dangerous);
            }
            Stmt::For(s) => {
                scan_block(&s.body, &dangerous, guard_table, ctx, locator, findings);
                scan_block(&s.orelse, &dangerous, guard_table, ctx, locator, findings);
            }
            Stmt::AsyncFor(s) => {
                scan_block(&s.body, &dangerous, guard_table, ctx, locator, findings);
                scan_block(&s.orelse, &dangerous, guard_table, ctx, locator, findings);
            }
            Stmt::While(s) => {
                scan_block(&s.body, &dangerous, guard_table, ctx, locator, findings);
                scan_block(&s.orelse, &dangerous, guard_table, ctx, locator, findings);
            }
            Stmt::Try(s) => {
                scan_block(&s.body, &dangerous, guard_table, ctx, locator, findings);
                scan_block(&s.orelse, &dangerous, guard_table, ctx, locator, findings);
                for handler in &s.handlers {
                    let rustpython_ast::ExceptHandler::ExceptHandler(h) = handler;
                    scan_block(&h.body, &dangerous, guard_table, ctx, locator, findings);
                }
                scan_block(&s.finalbody, &dangerous, guard_table, ctx, locator, findings);
            }
            Stmt::With(s) => scan_block(&s.body, &dangerous, guard_table, ctx, locator, findings),
            Stmt::AsyncWith(s) => {
                scan_block(&s.body, &dangerous, guard_table, ctx, locator, findings);
            }
            _ => {}
        }
    }
}

fn handle_if<'a>(
    if_stmt: &'a StmtIf,
    dangerous: &mut HashSet<&'a str>,
    guard_table: &GuardTable<'a>,
    ctx: &RuleContext,
    locator: &Locator,
    findings: &mut Vec<Finding>,
) {
    let guard = analyze_guard(&if_stmt.test);

    let Some((guard_var, is_none_check)) = guard else {
        scan_block(&if_stmt.body, dangerous, guard_table, ctx, locator, findings);
        scan_block(&if_stmt.orelse, dangerous, guard_table, ctx, locator, findings);
        return;
    };

    if !dangerous.contains(guard_var) {
        scan_block(&if_stmt.body, dangerous, guard_table, ctx, locator, findings);
        scan_block(&if_stmt.orelse, dangerous, guard_table, ctx, locator, findings);
        return;
    }

    if is_none_check {
        // `if x is None:` — x is still None inside the body.
        scan_block(&if_stmt.body, dangerous, guard_table, ctx, locator, findings);

        if block_terminates(&if_stmt.body) {
            dangerous.remove(guard_var);
        }

        if !if_stmt.orelse.is_empty() {
            let mut safe_in_else = dangerous.clone();
            safe_in_else.remove(guard_var);
            scan_block(&if_stmt.orelse, &safe_in_else, guard_table, ctx, locator, findings);
        }
    } else {
        // `if x is not None:` (or any other not-null guard) — x is safe
        // inside the body.
        let mut safe_in_body = dangerous.clone();
        safe_in_body.remove(guard_var);
        scan_block(&if_stmt.body, &safe_in_body, guard_table, ctx, locator, findings);

        if !if_stmt.orelse.is_empty() {
            scan_block(&if_stmt.orelse, dangerous, guard_table, ctx, locator, findings);
        }
    }
}

fn update_from_assignment<'a>(stmt: &'a Stmt, dangerous: &mut HashSet<&'a str>) {
    match stmt {
        Stmt::Assign(assign) => {
            for target in &assign.targets {
                let Expr::Name(name) = target else { continue };
                apply_assignment(name.id.as_str(), &assign.value, dangerous);
            }
        }
        Stmt::AnnAssign(ann) => {
            let Expr::Name(name) = ann.target.as_ref() else {
                return;
            };
            if let Some(value) = &ann.value {
                apply_assignment(name.id.as_str(), value, dangerous);
            }
        }
        _ => {}
    }
}

fn apply_assignment<'a>(name: &'a str, value: &Expr, dangerous: &mut HashSet<&'a str>) {
    if is_none_literal(value) {
        dangerous.insert(name);
    } else {
        dangerous.remove(name);
    }
}

/// If `expr` calls a function recorded in `guard_table`, and the argument
/// at the guarded positional index is a `Name` currently in `dangerous`,
/// remove it — the call only returns normally when the guard it
/// establishes holds. Method calls (`obj.f(...)`) shift the argument
/// index by one to account for the implicit receiver.
fn apply_guard_call<'a>(
    expr: &'a Expr,
    guard_table: &GuardTable<'a>,
    dangerous: &mut HashSet<&'a str>,
) {
    let Expr::Call(call) = expr else { return };
    let (name, index_shift) = match call.func.as_ref() {
        Expr::Name(n) => (n.id.as_str(), 0),
        Expr::Attribute(a) => (a.attr.as_str(), 1),
        _ => return,
    };
    let Some(guarded_indices) = guard_table.get(name) else {
        return;
    };
    for (position, arg) in call.args.iter().enumerate() {
        let Expr::Name(arg_name) = arg else { continue };
        if guarded_indices.contains(&(position + index_shift)) {
            dangerous.remove(arg_name.id.as_str());
        }
    }
}

/// Recognize a guard on an `If.test` or `Assert.test`. Returns the
/// guarded variable name and whether the guard tests *for* null (`true`)
/// or establishes non-null (`false`):
/// - `x is None` / `x is not None`
/// - `x` alone (truthy) / `not x`
/// - `isinstance(x, T)` / `hasattr(x, ...)`
fn analyze_guard(test: &Expr) -> Option<(&str, bool)> {
    match test {
        Expr::Compare(cmp) if cmp.ops.len() == 1 && cmp.comparators.len() == 1 => {
            let Expr::Name(name) = cmp.left.as_ref() else {
                return None;
            };
            if !is_none_literal(&cmp.comparators[0]) {
                return None;
            }
            match cmp.ops[0] {
                CmpOp::Is => Some((name.id.as_str(), true)),
                CmpOp::IsNot => Some((name.id.as_str(), false)),
                _ => None,
            }
        }
        Expr::Name(name) => Some((name.id.as_str(), false)),
        Expr::UnaryOp(u) if matches!(u.op, AstUnaryOp::Not) => match u.operand.as_ref() {
            Expr::Name(name) => Some((name.id.as_str(), true)),
            _ => None,
        },
        Expr::Call(call) => {
            let is_guard_call = matches!(
                call.func.as_ref(),
                Expr::Name(n) if n.id.as_str() == "isinstance" || n.id.as_str() == "hasattr"
            );
            if !is_guard_call {
                return None;
            }
            match call.args.first() {
                Some(Expr::Name(name)) => Some((name.id.as_str(), false)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// `true` if this exact sequence of statements always exits the block via
/// `return`, `raise`, `break`, or `continue` — checked shallowly, matching
/// how a reader skims a guard clause, not via full reachability analysis.
fn block_terminates(stmts: &[Stmt]) -> bool {
    stmts.iter().any(|stmt| {
        matches!(
            stmt,
            Stmt::Return(_) | Stmt::Raise(_) | Stmt::Break(_) | Stmt::Continue(_)
        )
    })
}

fn check_dereference<'a>(
    stmt: &'a Stmt,
    dangerous: &HashSet<&'a str>,
    ctx: &RuleContext,
    locator: &Locator,
    findings: &mut Vec<Finding>,
) {
    if dangerous.is_empty() {
        return;
    }
    for expr in direct_exprs(stmt) {
        check_expr(expr, dangerous, ctx, locator, findings);
    }
}

/// Check a single expression subtree for dereferences of names in
/// `dangerous`, respecting `and`/`or` short-circuit narrowing: under
/// `and`, a not-null guard among the earlier operands narrows the ones
/// that follow it; under `or`, a null guard does (only reaching a later
/// operand at all implies the earlier guard was false).
fn check_expr<'a>(
    expr: &'a Expr,
    dangerous: &HashSet<&'a str>,
    ctx: &RuleContext,
    locator: &Locator,
    findings: &mut Vec<Finding>,
) {
    match expr {
        Expr::BoolOp(b) => {
            let mut narrowed: HashSet<&'a str> = dangerous.clone();
            for value in &b.values {
                check_expr(value, &narrowed, ctx, locator, findings);
                if let Some((var, is_null_check)) = analyze_guard(value) {
                    let narrows = match b.op {
                        AstBoolOp::And => !is_null_check,
                        AstBoolOp::Or => is_null_check,
                    };
                    if narrows {
                        narrowed.remove(var);
                    }
                }
            }
        }
        Expr::Attribute(attr) => {
            if let Expr::Name(name) = attr.value.as_ref() {
                if dangerous.contains(name.id.as_str()) && !is_dunder(&attr.attr) {
                    report_attribute(attr, name.id.as_str(), ctx, locator, findings);
                }
            }
            check_expr(&attr.value, dangerous, ctx, locator, findings);
        }
        Expr::Subscript(sub) => {
            if let Expr::Name(name) = sub.value.as_ref() {
                if dangerous.contains(name.id.as_str()) {
                    report_subscript(sub, name.id.as_str(), ctx, locator, findings);
                }
            }
            check_expr(&sub.value, dangerous, ctx, locator, findings);
            check_expr(&sub.slice, dangerous, ctx, locator, findings);
        }
        _ => {
            for child in expr_children(expr) {
                check_expr(child, dangerous, ctx, locator, findings);
            }
        }
    }
}

/// `true` for dunder names (`__class__`, `__len__`, ...) — accessing one
/// on a `None`-bound name is safe and never worth reporting.
fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

fn report_attribute(
    attr: &ExprAttribute,
    var: &str,
    ctx: &RuleContext,
    locator: &Locator,
    findings: &mut Vec<Finding>,
) {
    let (line, column) = locator.start_line_column(attr);
    findings.push(
        Finding::new(
            ID,
            format!("Potential None dereference: '{var}' was assigned None."),
            Severity::High,
            ctx.filename,
            line,
            column,
        )
        .with_suggestion(format!("Check if '{var}' is None before accessing attributes.")),
    );
}

fn report_subscript(
    sub: &ExprSubscript,
    var: &str,
    ctx: &RuleContext,
    locator: &Locator,
    findings: &mut Vec<Finding>,
) {
    let (line, column) = locator.start_line_column(sub);
    findings.push(
        Finding::new(
            ID,
            format!("Potential None subscript: '{var}' was assigned None."),
            Severity::High,
            ctx.filename,
            line,
            column,
        )
        .with_suggestion(format!("Check if '{var}' is None before subscripting.")),
    );
}

/// The expressions a statement directly owns, for dereference checking —
/// deliberately shallow (does not descend into nested statement blocks,
/// which `scan_block`'s own recursion already covers with correctly
/// narrowed state).
fn direct_exprs(stmt: &Stmt) -> Vec<&Expr> {
    match stmt {
        Stmt::Return(s) => s.value.as_deref().into_iter().collect(),
        Stmt::Assign(s) => s.targets.iter().chain(std::iter::once(s.value.as_ref())).collect(),
        Stmt::AugAssign(s) => vec![&s.target, &s.value],
        Stmt::AnnAssign(s) => s.value.as_deref().into_iter().collect(),
        Stmt::For(s) => vec![&s.target, &s.iter],
        Stmt::AsyncFor(s) => vec![&s.target, &s.iter],
        Stmt::While(s) => vec![&s.test],
        Stmt::If(s) => vec![&s.test],
        Stmt::With(s) => s.items.iter().map(|item| &item.context_expr).collect(),
        Stmt::AsyncWith(s) => s.items.iter().map(|item| &item.context_expr).collect(),
        Stmt::Raise(s) => s.exc.as_deref().into_iter().collect(),
        Stmt::Assert(s) => {
            let mut exprs = vec![s.test.as_ref()];
            exprs.extend(s.msg.as_deref());
            exprs
        }
        Stmt::Expr(s) => vec![&s.value],
        Stmt::Delete(s) => s.targets.iter().collect(),
        _ => Vec::new(),
    }
}
