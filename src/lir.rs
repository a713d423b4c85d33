//! Low-level loop IR.
//!
//! The output of phase-2 lowering: explicit cursor set-up, coordinate merging,
//! conditional dispatch and cursor increments, wrapped in while-loops. A code
//! generator consumes this; nothing here executes it.

use crate::error::LowerResult;
use crate::expr::Access;
use crate::format::{Format, FormatMap};

/// One array dimension together with its storage format.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArrayLevel {
    pub name: String,
    pub format: Format,
}

impl ArrayLevel {
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }

    /// Level of the free-index dimension of `access`.
    pub fn from_access(access: &Access, formats: &FormatMap) -> LowerResult<Self> {
        let format = formats.level_format(&access.name)?;
        Ok(Self::new(access.name.clone(), format))
    }

    pub fn is_compressed(&self) -> bool {
        self.format.is_compressed()
    }
}

/// Levels that are driven or tested together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IteratorSet {
    pub levels: Vec<ArrayLevel>,
}

impl IteratorSet {
    pub fn new(levels: Vec<ArrayLevel>) -> Self {
        Self { levels }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArrayLevel> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.levels.iter().any(|l| l.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.name.as_str()).collect()
    }
}

impl FromIterator<ArrayLevel> for IteratorSet {
    fn from_iter<I: IntoIterator<Item = ArrayLevel>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Arithmetic over array accesses at the current coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LExpr {
    ArrayAccess(ArrayLevel),
    Add(Box<LExpr>, Box<LExpr>),
    Mul(Box<LExpr>, Box<LExpr>),
}

impl LExpr {
    /// Levels accessed, left to right.
    pub fn accesses(&self) -> Vec<&ArrayLevel> {
        match self {
            LExpr::ArrayAccess(level) => vec![level],
            LExpr::Add(a, b) | LExpr::Mul(a, b) => {
                let mut out = a.accesses();
                out.extend(b.accesses());
                out
            }
        }
    }
}

/// Loop IR statements.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// Initialize the cursors of every listed level
    IteratorDefinition(IteratorSet),
    /// Load the coordinate under a compressed level's cursor
    CompressedIndexDefinition(ArrayLevel),
    /// Merged coordinate: the minimum over the listed levels
    LogicalIndexDefinition(IteratorSet),
    ArrayAssignment { lhs: ArrayLevel, rhs: LExpr },
    /// First branch whose levels all sit on the merged coordinate wins
    IfStmt { branches: Vec<(IteratorSet, Stmt)> },
    /// Loop while every listed level still has coordinates
    WhileStmt { cond: IteratorSet, body: Box<Stmt> },
    SequenceStmt(Vec<Stmt>),
    /// Advance a cursor; a conditional increment only fires when the level
    /// matched the merged coordinate
    IncrementIterator { level: ArrayLevel, unconditional: bool },
}

impl Stmt {
    pub fn sequence(stmts: Vec<Stmt>) -> Self {
        Stmt::SequenceStmt(stmts)
    }

    pub fn while_loop(cond: IteratorSet, body: Stmt) -> Self {
        Stmt::WhileStmt {
            cond,
            body: Box::new(body),
        }
    }

    /// Statements of a sequence, or the statement itself.
    pub fn stmts(&self) -> &[Stmt] {
        match self {
            Stmt::SequenceStmt(stmts) => stmts,
            other => std::slice::from_ref(other),
        }
    }

    /// Top-level while-loops of a lowered program, in order.
    pub fn while_loops(&self) -> Vec<&Stmt> {
        self.stmts()
            .iter()
            .filter(|s| matches!(s, Stmt::WhileStmt { .. }))
            .collect()
    }

    /// Visit this statement and every nested statement in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Stmt)) {
        f(self);
        match self {
            Stmt::SequenceStmt(stmts) => {
                for stmt in stmts {
                    stmt.walk(f);
                }
            }
            Stmt::WhileStmt { body, .. } => body.walk(f),
            Stmt::IfStmt { branches } => {
                for (_, stmt) in branches {
                    stmt.walk(f);
                }
            }
            Stmt::IteratorDefinition(_)
            | Stmt::CompressedIndexDefinition(_)
            | Stmt::LogicalIndexDefinition(_)
            | Stmt::ArrayAssignment { .. }
            | Stmt::IncrementIterator { .. } => {}
        }
    }
}
