//! Shared AST traversal helpers.
//!
//! `rustpython_ast` gives each statement/expression kind its own struct, not
//! a single walkable tree the way Python's own `ast.walk` does. These
//! helpers rebuild that flattening for the handful of shapes the rules in
//! this module actually need: "every statement anywhere under this block"
//! and "every expression anywhere under this block".

use rustpython_ast::{Expr, ExceptHandler, Stmt};

/// Every statement reachable from `stmts`, in pre-order, including `stmts`
/// themselves and the bodies of nested blocks (if/while/for/try/with/def).
#[must_use]
pub fn walk_stmts<'a>(stmts: &'a [Stmt]) -> Vec<&'a Stmt> {
    let mut out = Vec::new();
    for stmt in stmts {
        walk_stmt_into(stmt, &mut out);
    }
    out
}

fn walk_stmt_into<'a>(stmt: &'a Stmt, out: &mut Vec<&'a Stmt>) {
    out.push(stmt);
    for block in child_blocks(stmt) {
        for child in block {
            walk_stmt_into(child, out);
        }
    }
}

/// The statement-list children of a statement: function/class bodies,
/// if/while/for bodies and `orelse`, try bodies/handlers/orelse/finalbody,
/// with bodies. Leaves (return, raise, pass, assign, expr, ...) have none.
fn child_blocks(stmt: &Stmt) -> Vec<&[Stmt]> {
    match stmt {
        Stmt::FunctionDef(s) => vec![&s.body],
        Stmt::AsyncFunctionDef(s) => vec![&s.body],
        Stmt::ClassDef(s) => vec![&s.body],
        Stmt::If(s) => vec![&s.body, &s.orelse],
        Stmt::While(s) => vec![&s.body, &s.orelse],
        Stmt::For(s) => vec![&s.body, &s.orelse],
        Stmt::AsyncFor(s) => vec![&s.body, &s.orelse],
        Stmt::With(s) => vec![&s.body],
        Stmt::AsyncWith(s) => vec![&s.body],
        Stmt::Try(s) => {
            let mut blocks = vec![s.body.as_slice(), s.orelse.as_slice(), s.finalbody.as_slice()];
            for handler in &s.handlers {
                let ExceptHandler::ExceptHandler(h) = handler;
                blocks.push(h.body.as_slice());
            }
            blocks
        }
        Stmt::TryStar(s) => {
            let mut blocks = vec![s.body.as_slice(), s.orelse.as_slice(), s.finalbody.as_slice()];
            for handler in &s.handlers {
                let ExceptHandler::ExceptHandler(h) = handler;
                blocks.push(h.body.as_slice());
            }
            blocks
        }
        _ => Vec::new(),
    }
}

/// The expressions a single statement directly owns (its `test`, `value`,
/// `targets`, and so on) — not recursing into nested statement blocks,
/// since [`walk_stmts`] already flattens those separately.
fn direct_exprs(stmt: &Stmt) -> Vec<&Expr> {
    match stmt {
        Stmt::FunctionDef(s) => default_exprs(&s.args),
        Stmt::AsyncFunctionDef(s) => default_exprs(&s.args),
        Stmt::Return(s) => s.value.as_deref().into_iter().collect(),
        Stmt::Assign(s) => s.targets.iter().chain(std::iter::once(s.value.as_ref())).collect(),
        Stmt::AugAssign(s) => vec![&s.target, &s.value],
        Stmt::AnnAssign(s) => {
            let mut exprs = vec![s.target.as_ref()];
            if let Some(value) = &s.value {
                exprs.push(value);
            }
            exprs
        }
        Stmt::For(s) => vec![&s.target, &s.iter],
        Stmt::AsyncFor(s) => vec![&s.target, &s.iter],
        Stmt::While(s) => vec![&s.test],
        Stmt::If(s) => vec![&s.test],
        Stmt::With(s) => s.items.iter().map(|item| &item.context_expr).collect(),
        Stmt::AsyncWith(s) => s.items.iter().map(|item| &item.context_expr).collect(),
        Stmt::Raise(s) => {
            let mut exprs = Vec::new();
            if let Some(exc) = &s.exc {
                exprs.push(exc.as_ref());
            }
            if let Some(cause) = &s.cause {
                exprs.push(cause.as_ref());
            }
            exprs
        }
        Stmt::Assert(s) => {
            let mut exprs = vec![s.test.as_ref()];
            if let Some(msg) = &s.msg {
                exprs.push(msg);
            }
            exprs
        }
        Stmt::Expr(s) => vec![&s.value],
        Stmt::Delete(s) => s.targets.iter().collect(),
        _ => Vec::new(),
    }
}

fn default_exprs(args: &rustpython_ast::Arguments) -> Vec<&Expr> {
    args.posonlyargs
        .iter()
        .chain(args.args.iter())
        .chain(args.kwonlyargs.iter())
        .filter_map(|arg| arg.default.as_deref())
        .collect()
}

/// Every expression reachable from `expr`, in pre-order, including `expr`
/// itself.
#[must_use]
pub fn walk_exprs<'a>(expr: &'a Expr) -> Vec<&'a Expr> {
    let mut out = Vec::new();
    walk_expr_into(expr, &mut out);
    out
}

fn walk_expr_into<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    out.push(expr);
    for child in expr_children(expr) {
        walk_expr_into(child, out);
    }
}

pub(crate) fn expr_children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::BoolOp(e) => e.values.iter().collect(),
        Expr::NamedExpr(e) => vec![&e.target, &e.value],
        Expr::BinOp(e) => vec![&e.left, &e.right],
        Expr::UnaryOp(e) => vec![e.operand.as_ref()],
        Expr::Lambda(_) => Vec::new(),
        Expr::IfExp(e) => vec![&e.test, &e.body, &e.orelse],
        Expr::Dict(e) => e
            .keys
            .iter()
            .flatten()
            .chain(e.values.iter())
            .collect(),
        Expr::Set(e) => e.elts.iter().collect(),
        Expr::ListComp(e) => vec![e.elt.as_ref()],
        Expr::SetComp(e) => vec![e.elt.as_ref()],
        Expr::DictComp(e) => vec![e.key.as_ref(), e.value.as_ref()],
        Expr::GeneratorExp(e) => vec![e.elt.as_ref()],
        Expr::Await(e) => vec![e.value.as_ref()],
        Expr::Yield(e) => e.value.as_deref().into_iter().collect(),
        Expr::YieldFrom(e) => vec![e.value.as_ref()],
        Expr::Compare(e) => std::iter::once(e.left.as_ref()).chain(e.comparators.iter()).collect(),
        Expr::Call(e) => {
            let mut children = vec![e.func.as_ref()];
            children.extend(e.args.iter());
            children.extend(e.keywords.iter().map(|kw| &kw.value));
            children
        }
        Expr::FormattedValue(e) => vec![e.value.as_ref()],
        Expr::JoinedStr(e) => e.values.iter().collect(),
        Expr::Attribute(e) => vec![e.value.as_ref()],
        Expr::Subscript(e) => vec![e.value.as_ref(), e.slice.as_ref()],
        Expr::Starred(e) => vec![e.value.as_ref()],
        Expr::List(e) => e.elts.iter().collect(),
        Expr::Tuple(e) => e.elts.iter().collect(),
        Expr::Slice(e) => {
            let mut children = Vec::new();
            if let Some(lower) = &e.lower {
                children.push(lower.as_ref());
            }
            if let Some(upper) = &e.upper {
                children.push(upper.as_ref());
            }
            if let Some(step) = &e.step {
                children.push(step.as_ref());
            }
            children
        }
        Expr::Name(_) | Expr::Constant(_) => Vec::new(),
        _ => Vec::new(),
    }
}

/// All expressions reachable from a statement block, combining
/// [`walk_stmts`] with each statement's directly-owned expressions and
/// their subexpressions.
#[must_use]
pub fn walk_all_exprs<'a>(stmts: &'a [Stmt]) -> Vec<&'a Expr> {
    walk_stmts(stmts)
        .into_iter()
        .flat_map(direct_exprs)
        .flat_map(walk_exprs)
        .collect()
}

/// `true` if `func` is a bare-name call to `name` (e.g. `open(...)`).
#[must_use]
pub fn is_name_call(expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::Call(call) => matches!(call.func.as_ref(), Expr::Name(n) if n.id.as_str() == name),
        _ => false,
    }
}

/// The called function's bare name, if the call target is a plain name
/// (`foo()`, not `obj.foo()`).
#[must_use]
pub fn call_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Call(call) => match call.func.as_ref() {
            Expr::Name(n) => Some(n.id.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// The called method's attribute name, if the call target is an attribute
/// access (`obj.foo()`).
#[must_use]
pub fn call_attr(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Call(call) => match call.func.as_ref() {
            Expr::Attribute(attr) => Some(attr.attr.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// `true` if the constant expression is Python's `None` literal.
#[must_use]
pub fn is_none_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(c) if matches!(c.value, rustpython_ast::Constant::None))
}

/// `true` if the constant expression is a truthy boolean or integer
/// literal (`True` or `1`), matching `while True:` / `while 1:`.
#[must_use]
pub fn is_always_true_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Constant(c) => match &c.value {
            rustpython_ast::Constant::Bool(b) => *b,
            rustpython_ast::Constant::Int(i) => i.to_string() == "1",
            _ => false,
        },
        _ => false,
    }
}
