//! Gathering the arrays a statement touches.

use std::collections::HashSet;

use tracing::trace;

use crate::error::{LowerError, LowerResult};
use crate::expr::{Access, Expr, IndexStmt};
use crate::format::FormatMap;
use crate::lir::{ArrayLevel, IteratorSet};

/// Traversal state for [`gather_iterator_set`].
struct Gatherer<'a> {
    formats: &'a FormatMap,
    levels: Vec<ArrayLevel>,
    seen: HashSet<String>,
    written: HashSet<String>,
}

impl<'a> Gatherer<'a> {
    fn new(formats: &'a FormatMap) -> Self {
        Self {
            formats,
            levels: Vec::new(),
            seen: HashSet::new(),
            written: HashSet::new(),
        }
    }

    fn record(&mut self, access: &Access) -> LowerResult<()> {
        if self.seen.insert(access.name.clone()) {
            self.levels.push(ArrayLevel::from_access(access, self.formats)?);
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &IndexStmt) -> LowerResult<()> {
        match stmt {
            IndexStmt::ForAll { body, .. } => self.stmt(body),
            IndexStmt::ArrayAssignment { lhs, rhs } => {
                if !self.written.insert(lhs.name.clone()) {
                    return Err(LowerError::DuplicateWrite(lhs.name.clone()));
                }
                self.record(lhs)?;
                self.expr(rhs)
            }
        }
    }

    fn expr(&mut self, expr: &Expr) -> LowerResult<()> {
        match expr {
            Expr::ArrayRead(access) => {
                if self.written.contains(&access.name) {
                    return Err(LowerError::ReadAfterWrite(access.name.clone()));
                }
                self.record(access)
            }
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                self.expr(a)?;
                self.expr(b)
            }
        }
    }
}

/// Arrays touched by `stmt` in traversal order (written array first), each
/// listed once.
///
/// Rejects statements that write an array twice or read the array they
/// write, since in-place updates are not supported.
pub fn gather_iterator_set(stmt: &IndexStmt, formats: &FormatMap) -> LowerResult<IteratorSet> {
    gather_iterator_set_all(std::slice::from_ref(stmt), formats)
}

/// Like [`gather_iterator_set`], over several statements in one traversal.
pub fn gather_iterator_set_all(stmts: &[IndexStmt], formats: &FormatMap) -> LowerResult<IteratorSet> {
    let mut gatherer = Gatherer::new(formats);
    for stmt in stmts {
        gatherer.stmt(stmt)?;
    }
    trace!(arrays = gatherer.levels.len(), "gathered iterator set");
    Ok(IteratorSet::new(gatherer.levels))
}
