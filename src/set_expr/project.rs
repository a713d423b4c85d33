//! Restricting an assignment body to the reads a space keeps alive.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::{LowerError, LowerResult};
use crate::expr::{Access, Expr, IndexStmt};

use super::SetExpr;

/// Keep the parts of `expr` that are still non-zero when only `live` arrays
/// are present.
///
/// A sum keeps whichever addends survive. A product needs both factors; the
/// case where they are both present belongs to a more specific lattice point.
pub fn project_expr(expr: &Expr, live: &BTreeSet<&Access>) -> Option<Expr> {
    match expr {
        Expr::ArrayRead(access) => live.contains(access).then(|| expr.clone()),
        Expr::Add(a, b) => match (project_expr(a, live), project_expr(b, live)) {
            (Some(a), Some(b)) => Some(Expr::Add(Rc::new(a), Rc::new(b))),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        },
        Expr::Mul(a, b) => {
            let a = project_expr(a, live)?;
            let b = project_expr(b, live)?;
            Some(Expr::Mul(Rc::new(a), Rc::new(b)))
        }
    }
}

/// Project the right-hand side of an assignment onto the leaves of `sexpr`.
pub fn project_stmt(stmt: &IndexStmt, sexpr: &SetExpr) -> LowerResult<IndexStmt> {
    let (lhs, rhs) = stmt.as_assignment()?;
    let live = sexpr.live_dims();
    let rhs = project_expr(rhs, &live).ok_or_else(|| LowerError::EmptyProjection(sexpr.clone()))?;
    Ok(IndexStmt::assign(lhs.clone(), rhs))
}
