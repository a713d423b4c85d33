//! Set-expression algebra over per-array coordinate domains.
//!
//! A `SetExpr` describes the coordinates a loop must visit: `ArrayDim(A)` is the
//! set of coordinates stored in `A`, `Union` keeps a coordinate present in
//! either operand and `Intersection` one present in both.
//!
//! # Canonical order
//!
//! The derived `Ord` compares the variant first, then leaf names, then the
//! operands of a binary node left to right. Two trees compare equal exactly
//! when they are structurally identical, and `Hash` agrees with that equality,
//! so a `SetExpr` is directly usable as a map key. The merge lattice relies on
//! this to collapse independently built but identical spaces into one vertex.
//! Operands are not reordered: `A ∪ B` and `B ∪ A` are distinct keys.
//!
//! # Utilities
//!
//! - **simplify**: remove an exhausted iterator from a space
//! - **classify**: split leaves into loop-driving iterators and locators
//! - **project**: restrict an assignment to the reads a space keeps alive

pub mod classify;
pub mod project;
pub mod simplify;

use std::collections::BTreeSet;
use std::ops;
use std::rc::Rc;

use crate::expr::{Access, Expr};

pub use classify::{split_iterators_locators, SparsityMap, Split};
pub use project::{project_expr, project_stmt};
pub use simplify::{simplify, Simplified};

/// An iteration space.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetExpr {
    ArrayDim(Access),
    Union(Rc<SetExpr>, Rc<SetExpr>),
    Intersection(Rc<SetExpr>, Rc<SetExpr>),
}

impl SetExpr {
    pub fn dim(name: impl Into<String>) -> Self {
        SetExpr::ArrayDim(Access::new(name))
    }

    pub fn union(a: SetExpr, b: SetExpr) -> Self {
        SetExpr::Union(Rc::new(a), Rc::new(b))
    }

    pub fn intersection(a: SetExpr, b: SetExpr) -> Self {
        SetExpr::Intersection(Rc::new(a), Rc::new(b))
    }

    /// Iteration space of an expression: reads are their own dimension, sums
    /// need every coordinate where either addend is stored and products only
    /// those where both factors are.
    pub fn of_expr(expr: &Expr) -> Self {
        match expr {
            Expr::ArrayRead(access) => SetExpr::ArrayDim(access.clone()),
            Expr::Add(a, b) => SetExpr::union(SetExpr::of_expr(a), SetExpr::of_expr(b)),
            Expr::Mul(a, b) => SetExpr::intersection(SetExpr::of_expr(a), SetExpr::of_expr(b)),
        }
    }

    /// Distinct arrays appearing as leaves.
    pub fn live_dims(&self) -> BTreeSet<&Access> {
        let mut out = BTreeSet::new();
        self.collect_dims(&mut out);
        out
    }

    fn collect_dims<'a>(&'a self, out: &mut BTreeSet<&'a Access>) {
        match self {
            SetExpr::ArrayDim(access) => {
                out.insert(access);
            }
            SetExpr::Union(a, b) | SetExpr::Intersection(a, b) => {
                a.collect_dims(out);
                b.collect_dims(out);
            }
        }
    }

    /// Number of leaves, counting repeats.
    pub fn leaf_count(&self) -> usize {
        match self {
            SetExpr::ArrayDim(_) => 1,
            SetExpr::Union(a, b) | SetExpr::Intersection(a, b) => a.leaf_count() + b.leaf_count(),
        }
    }

    pub fn contains_dim(&self, name: &str) -> bool {
        match self {
            SetExpr::ArrayDim(access) => access.name == name,
            SetExpr::Union(a, b) | SetExpr::Intersection(a, b) => {
                a.contains_dim(name) || b.contains_dim(name)
            }
        }
    }
}

impl ops::BitOr for SetExpr {
    type Output = SetExpr;

    fn bitor(self, rhs: SetExpr) -> SetExpr {
        SetExpr::union(self, rhs)
    }
}

impl ops::BitAnd for SetExpr {
    type Output = SetExpr;

    fn bitand(self, rhs: SetExpr) -> SetExpr {
        SetExpr::intersection(self, rhs)
    }
}
