use typeswitch_core::package::Package;
use typeswitch_core::syntax::{ExprKind, Expr, SourceFile, Stmt, TypeSwitchStmt};
use typeswitch_core::types::Type;

use crate::types::AnalysisError;

/// Every type switch in `file`, in pre-order: a switch comes before the
/// switches nested in its clauses.
pub fn locate(file: &SourceFile) -> Vec<&TypeSwitchStmt> {
    let mut out = Vec::new();
    walk(&file.body, &mut out);
    out
}

fn walk<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a TypeSwitchStmt>) {
    for stmt in stmts {
        match stmt {
            Stmt::Block { stmts } => walk(stmts, out),
            Stmt::TypeSwitch(sw) => {
                out.push(sw);
                for clause in &sw.clauses {
                    walk(&clause.body, out);
                }
            }
            Stmt::Expr { .. } | Stmt::Assign(_) | Stmt::Other => {}
        }
    }
}

/// The expression being switched on, taken from the guard.
///
/// `Ok(None)` when the guard has a recognized form but holds no type
/// assertion. Any other guard form is a front-end contract violation.
pub fn subject_expr(sw: &TypeSwitchStmt) -> Result<Option<&Expr>, AnalysisError> {
    match sw.guard.as_ref() {
        Stmt::Expr { expr } => Ok(assertion_operand(expr)),
        Stmt::Assign(assign) => Ok(assign.rhs.first().and_then(assertion_operand)),
        other => Err(AnalysisError::UnsupportedConstruct {
            pos: sw.pos.clone(),
            detail: guard_kind(other).to_string(),
        }),
    }
}

fn assertion_operand(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::TypeAssert { operand, .. } => Some(operand),
        _ => None,
    }
}

fn guard_kind(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Block { .. } => "block",
        Stmt::Expr { .. } => "expression",
        Stmt::Assign(_) => "assignment",
        Stmt::TypeSwitch(_) => "type switch",
        Stmt::Other => "statement",
    }
}

/// Underlying shape of the switch subject's static type.
///
/// `Ok(None)` when the subject's type is unknown or not visible from `pkg`.
pub fn resolve_subject(sw: &TypeSwitchStmt, pkg: &Package) -> Result<Option<Type>, AnalysisError> {
    let Some(subject) = subject_expr(sw)? else {
        tracing::debug!(pos = %sw.pos, "type switch guard holds no type assertion");
        return Ok(None);
    };
    let Some(ty) = &subject.ty else {
        tracing::debug!(pos = %sw.pos, "type switch subject has no known type");
        return Ok(None);
    };
    let underlying = pkg.underlying(ty);
    if underlying.is_none() {
        tracing::debug!(pos = %sw.pos, ty = %ty, "type switch subject type not visible");
    }
    Ok(underlying)
}
