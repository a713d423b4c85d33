//! Index-notation expressions and statements.
//!
//! Every node is immutable once built. Children are held behind `Rc`, so a
//! subexpression can be shared by several parents without copying; cloning a
//! node only bumps reference counts.

use std::ops;
use std::rc::Rc;

use crate::error::{LowerError, LowerResult};
use crate::set_expr::SetExpr;

/// One array indexed by the single free index, e.g. `A(i)`.
///
/// Identity is the array name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Access {
    pub name: String,
}

impl Access {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Arithmetic over array reads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    ArrayRead(Access),
    Add(Rc<Expr>, Rc<Expr>),
    Mul(Rc<Expr>, Rc<Expr>),
}

impl Expr {
    /// Read of the named array at the free index.
    pub fn read(name: impl Into<String>) -> Self {
        Expr::ArrayRead(Access::new(name))
    }

    pub fn add(a: Expr, b: Expr) -> Self {
        Expr::Add(Rc::new(a), Rc::new(b))
    }

    pub fn mul(a: Expr, b: Expr) -> Self {
        Expr::Mul(Rc::new(a), Rc::new(b))
    }

    /// Arrays read by this expression, left to right, with repeats.
    pub fn reads(&self) -> Vec<&Access> {
        let mut out = Vec::new();
        self.collect_reads(&mut out);
        out
    }

    fn collect_reads<'a>(&'a self, out: &mut Vec<&'a Access>) {
        match self {
            Expr::ArrayRead(access) => out.push(access),
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                a.collect_reads(out);
                b.collect_reads(out);
            }
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add(self, rhs)
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::mul(self, rhs)
    }
}

/// A surface assignment `lhs(i) = rhs`, the input to phase-1 lowering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub access: Access,
    pub rhs: Expr,
}

impl Assignment {
    pub fn new(lhs: impl Into<String>, rhs: Expr) -> Self {
        Self {
            access: Access::new(lhs),
            rhs,
        }
    }
}

/// Index statements: the output of phase 1 and input of phase 2.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexStmt {
    ArrayAssignment { lhs: Access, rhs: Expr },
    /// Loop over `sexpr`. Only built by phase-1 lowering, which derives
    /// `sexpr` from the body's right-hand side.
    ForAll { sexpr: SetExpr, body: Rc<IndexStmt> },
}

impl IndexStmt {
    pub fn assign(lhs: Access, rhs: Expr) -> Self {
        IndexStmt::ArrayAssignment { lhs, rhs }
    }

    pub(crate) fn for_all(sexpr: SetExpr, body: IndexStmt) -> Self {
        IndexStmt::ForAll {
            sexpr,
            body: Rc::new(body),
        }
    }

    /// Variant name, for error reporting.
    pub fn kind_name(&self) -> &'static str {
        match self {
            IndexStmt::ArrayAssignment { .. } => "assignment",
            IndexStmt::ForAll { .. } => "forall",
        }
    }

    /// The `(lhs, rhs)` of an assignment.
    pub fn as_assignment(&self) -> LowerResult<(&Access, &Expr)> {
        match self {
            IndexStmt::ArrayAssignment { lhs, rhs } => Ok((lhs, rhs)),
            other => Err(LowerError::UnexpectedStatement {
                expected: "assignment",
                found: other.kind_name(),
            }),
        }
    }

    /// The `(space, body)` of a forall.
    pub fn as_for_all(&self) -> LowerResult<(&SetExpr, &IndexStmt)> {
        match self {
            IndexStmt::ForAll { sexpr, body } => Ok((sexpr, body)),
            other => Err(LowerError::UnexpectedStatement {
                expected: "forall",
                found: other.kind_name(),
            }),
        }
    }
}
