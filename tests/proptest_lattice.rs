//! Property tests for merge lattices and the loop programs lowered from them

mod generators;

use std::collections::{BTreeSet, HashSet};

use coiter::{lower, Assignment, Expr, FormatMap, IndexStmt, MergeLattice, SetExpr, Stmt};
use proptest::prelude::*;

fn lattice_of(expr: &Expr, formats: &FormatMap) -> MergeLattice {
    let sexpr = SetExpr::of_expr(expr);
    let body = IndexStmt::assign(coiter::Access::new(generators::OUTPUT), expr.clone());
    MergeLattice::build(&sexpr, &body, formats).unwrap()
}

fn names(sexpr: &SetExpr) -> BTreeSet<String> {
    sexpr.live_dims().into_iter().map(|a| a.name.clone()).collect()
}

proptest! {
    /// One point per reachable space, at most one per proper subset of
    /// removed arrays
    #[test]
    fn point_count_is_bounded(
        expr in generators::arb_expr(),
        formats in generators::arb_formats()
    ) {
        let lattice = lattice_of(&expr, &formats);
        let k = names(&lattice.root().sexpr).len();
        prop_assert!(lattice.len() < 1 << k);

        let keys: HashSet<&SetExpr> = lattice.iter().map(|(_, p)| &p.sexpr).collect();
        prop_assert_eq!(keys.len(), lattice.len());
    }

    /// The root covers every array of the space exactly once
    #[test]
    fn root_covers_every_array(
        expr in generators::arb_expr(),
        formats in generators::arb_formats()
    ) {
        let lattice = lattice_of(&expr, &formats);
        let root = lattice.root();
        let levels: Vec<&str> = root.levels().map(|l| l.name.as_str()).collect();
        let distinct: BTreeSet<String> = levels.iter().map(|n| n.to_string()).collect();
        prop_assert_eq!(distinct.len(), levels.len());
        prop_assert_eq!(distinct, names(&SetExpr::of_expr(&expr)));
    }

    /// Every point can drive a loop
    #[test]
    fn every_point_has_an_iterator(
        expr in generators::arb_expr(),
        formats in generators::arb_formats()
    ) {
        let lattice = lattice_of(&expr, &formats);
        for (_, point) in lattice.iter() {
            prop_assert!(!point.iterators.is_empty());
        }
    }

    /// Dominated points cover strictly fewer arrays, never include the point
    /// itself and come parents first
    #[test]
    fn sub_points_are_dominated(
        expr in generators::arb_expr(),
        formats in generators::arb_formats()
    ) {
        let lattice = lattice_of(&expr, &formats);
        for (id, point) in lattice.iter() {
            let subs = lattice.sub_points(id);
            prop_assert!(!subs.contains(&id));

            let live = names(&point.sexpr);
            for &sub in &subs {
                let sub_live = names(&lattice.point(sub).sexpr);
                prop_assert!(sub_live.is_subset(&live));
                prop_assert!(sub_live.len() < live.len());
            }
            for (pos, &sub) in subs.iter().enumerate() {
                for child in &lattice.point(sub).children {
                    let child_pos = subs.iter().position(|s| s == child);
                    prop_assert!(matches!(child_pos, Some(p) if p > pos));
                }
            }
        }
        let reachable = lattice.sub_points(lattice.root_id()).len() + 1;
        prop_assert_eq!(reachable, lattice.len());
    }

    /// With every array compressed, each removal loses an iterator
    #[test]
    fn compressed_children_lose_iterators(expr in generators::arb_expr()) {
        let lattice = lattice_of(&expr, &generators::all_compressed());
        for (_, point) in lattice.iter() {
            for &child in &point.children {
                prop_assert!(lattice.point(child).iterators.len() < point.iterators.len());
            }
        }
    }

    /// Lowering emits one loop per point; each loop advances all of its
    /// iterators, conditionally only when several compressed levels merge
    #[test]
    fn loops_advance_their_iterators(
        expr in generators::arb_expr(),
        formats in generators::arb_formats()
    ) {
        let assignment = Assignment::new(generators::OUTPUT, expr.clone());
        let program = lower(&assignment, &formats).unwrap();
        let lattice = lattice_of(&expr, &formats);

        let loops = program.while_loops();
        prop_assert_eq!(loops.len(), lattice.len());

        for stmt in loops {
            let Stmt::WhileStmt { cond, body } = stmt else {
                unreachable!("while_loops only yields loops");
            };
            let mut advanced = Vec::new();
            for s in body.stmts() {
                if let Stmt::IncrementIterator { level, unconditional } = s {
                    let expected = !level.is_compressed() || cond.len() == 1;
                    prop_assert_eq!(*unconditional, expected);
                    advanced.push(level.clone());
                }
            }
            prop_assert_eq!(&advanced, &cond.levels);
        }
    }

    /// Assignments only touch levels whose cursors were initialized
    #[test]
    fn accesses_are_initialized(
        expr in generators::arb_expr(),
        formats in generators::arb_formats()
    ) {
        let program = lower(&Assignment::new(generators::OUTPUT, expr), &formats).unwrap();
        let Some(Stmt::IteratorDefinition(init)) = program.stmts().first() else {
            panic!("program must start with cursor set-up");
        };

        let mut touched = Vec::new();
        program.walk(&mut |s| {
            if let Stmt::ArrayAssignment { rhs, .. } = s {
                touched.extend(rhs.accesses().into_iter().cloned());
            }
        });
        prop_assert!(!touched.is_empty());
        for level in &touched {
            prop_assert!(init.levels.contains(level), "{} was never initialized", level);
        }
    }
}
