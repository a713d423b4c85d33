//! Lowering index notation to loop IR.
//!
//! Phase 1 wraps an assignment in a `ForAll` over the iteration space its
//! right-hand side needs. Phase 2 builds the merge lattice of that space and
//! emits one while-loop per lattice point. The loops run in sequence: each
//! runs until one of its iterators is exhausted and leaves the remaining
//! coordinates to the loops of the points below it.

use tracing::{debug, instrument};

use crate::error::LowerResult;
use crate::expr::{Assignment, Expr, IndexStmt};
use crate::format::FormatMap;
use crate::gather::gather_iterator_set;
use crate::lattice::{MergeLattice, MergePoint, PointId};
use crate::lir::{ArrayLevel, IteratorSet, LExpr, Stmt};
use crate::set_expr::SetExpr;

/// Phase 1: `lhs = rhs` becomes `forall space(rhs): lhs = rhs`.
pub fn lower_assignment(assignment: &Assignment) -> IndexStmt {
    let body = IndexStmt::assign(assignment.access.clone(), assignment.rhs.clone());
    IndexStmt::for_all(SetExpr::of_expr(&assignment.rhs), body)
}

/// Phase 2: lower a `ForAll` produced by [`lower_assignment`] to loop IR.
///
/// The output is a sequence of one cursor initialization over the root
/// point's levels, then the root's while-loop, then one while-loop per
/// dominated point, most constrained first.
#[instrument(level = "debug", skip_all)]
pub fn lower_index_stmt(stmt: &IndexStmt, formats: &FormatMap) -> LowerResult<Stmt> {
    let (sexpr, body) = stmt.as_for_all()?;
    let arrays = gather_iterator_set(body, formats)?;
    debug!(space = %sexpr, arrays = ?arrays.names(), "lowering forall");

    let lattice = MergeLattice::build(sexpr, body, formats)?;
    let root = lattice.root_id();

    let mut stmts = vec![Stmt::IteratorDefinition(
        lattice.root().levels().cloned().collect(),
    )];
    stmts.push(lower_point(&lattice, root, formats)?);
    for id in lattice.sub_points(root) {
        stmts.push(lower_point(&lattice, id, formats)?);
    }

    debug!(loops = stmts.len() - 1, "lowered forall");
    Ok(Stmt::sequence(stmts))
}

/// Both phases.
pub fn lower(assignment: &Assignment, formats: &FormatMap) -> LowerResult<Stmt> {
    lower_index_stmt(&lower_assignment(assignment), formats)
}

fn lower_point(lattice: &MergeLattice, id: PointId, formats: &FormatMap) -> LowerResult<Stmt> {
    let point = lattice.point(id);
    let iterators = IteratorSet::new(point.iterators.clone());
    let mut body = Vec::new();

    for level in point.iterators.iter().filter(|l| l.is_compressed()) {
        body.push(Stmt::CompressedIndexDefinition(level.clone()));
    }
    body.push(Stmt::LogicalIndexDefinition(iterators.clone()));

    let mut branches = vec![(iterators.clone(), lower_body(point, formats)?)];
    for sub in lattice.sub_points(id) {
        let sub = lattice.point(sub);
        branches.push((IteratorSet::new(sub.iterators.clone()), lower_body(sub, formats)?));
    }
    if branches.len() == 1 && point.iterators.len() <= 1 {
        let (_, assign) = branches.remove(0);
        body.push(assign);
    } else {
        body.push(Stmt::IfStmt { branches });
    }

    let lone = point.iterators.len() == 1;
    for level in &point.iterators {
        body.push(Stmt::IncrementIterator {
            level: level.clone(),
            unconditional: !level.is_compressed() || lone,
        });
    }

    Ok(Stmt::while_loop(iterators, Stmt::sequence(body)))
}

fn lower_body(point: &MergePoint, formats: &FormatMap) -> LowerResult<Stmt> {
    let (lhs, rhs) = point.body.as_assignment()?;
    Ok(Stmt::ArrayAssignment {
        lhs: ArrayLevel::from_access(lhs, formats)?,
        rhs: lower_expr(rhs, formats)?,
    })
}

fn lower_expr(expr: &Expr, formats: &FormatMap) -> LowerResult<LExpr> {
    Ok(match expr {
        Expr::ArrayRead(access) => LExpr::ArrayAccess(ArrayLevel::from_access(access, formats)?),
        Expr::Add(a, b) => LExpr::Add(
            Box::new(lower_expr(a, formats)?),
            Box::new(lower_expr(b, formats)?),
        ),
        Expr::Mul(a, b) => LExpr::Mul(
            Box::new(lower_expr(a, formats)?),
            Box::new(lower_expr(b, formats)?),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LowerError;
    use crate::expr::Access;
    use crate::format::Format;

    #[test]
    fn test_phase_one_wraps_derived_space() {
        let assignment = Assignment::new("C", Expr::read("A") * Expr::read("B"));
        let stmt = lower_assignment(&assignment);
        let (sexpr, body) = stmt.as_for_all().unwrap();
        assert_eq!(*sexpr, SetExpr::dim("A") & SetExpr::dim("B"));
        assert_eq!(
            *body,
            IndexStmt::assign(Access::new("C"), Expr::read("A") * Expr::read("B"))
        );
    }

    #[test]
    fn test_phase_two_requires_forall() {
        let formats: FormatMap = [("A", Format::Compressed), ("C", Format::Compressed)]
            .into_iter()
            .collect();
        let stmt = IndexStmt::assign(Access::new("C"), Expr::read("A"));
        assert_eq!(
            lower_index_stmt(&stmt, &formats),
            Err(LowerError::UnexpectedStatement {
                expected: "forall",
                found: "assignment"
            })
        );
    }

    #[test]
    fn test_output_array_must_be_known() {
        let formats: FormatMap = [("A", Format::Compressed)].into_iter().collect();
        let assignment = Assignment::new("C", Expr::read("A"));
        assert_eq!(
            lower(&assignment, &formats),
            Err(LowerError::UnknownArray("C".to_string()))
        );
    }
}
