//! Sparsity classification and the iterator/locator split.
//!
//! Compressed dimensions can only be enumerated, never probed, so they must
//! drive the loop. A dense dimension can be addressed by coordinate; when it
//! sits under an intersection, or under a union that is dense as a whole, some
//! other operand already decides which coordinates are visited and the dense
//! dimension becomes a locator.

use std::collections::HashMap;

use crate::error::{LowerError, LowerResult};
use crate::format::FormatMap;
use crate::lir::ArrayLevel;

use super::SetExpr;

/// Bottom-up sparsity of every node of a set expression.
///
/// A leaf is sparse iff its array is compressed, an intersection iff both
/// operands are, a union iff either operand is.
#[derive(Clone, Debug, Default)]
pub struct SparsityMap {
    sparse: HashMap<SetExpr, bool>,
}

impl SparsityMap {
    pub fn build(sexpr: &SetExpr, formats: &FormatMap) -> LowerResult<Self> {
        let mut map = SparsityMap::default();
        map.visit(sexpr, formats)?;
        Ok(map)
    }

    fn visit(&mut self, sexpr: &SetExpr, formats: &FormatMap) -> LowerResult<bool> {
        if let Some(&sparse) = self.sparse.get(sexpr) {
            return Ok(sparse);
        }
        let sparse = match sexpr {
            SetExpr::ArrayDim(access) => formats.level_format(&access.name)?.is_compressed(),
            SetExpr::Intersection(a, b) => {
                let a = self.visit(a, formats)?;
                let b = self.visit(b, formats)?;
                a && b
            }
            SetExpr::Union(a, b) => {
                let a = self.visit(a, formats)?;
                let b = self.visit(b, formats)?;
                a || b
            }
        };
        self.sparse.insert(sexpr.clone(), sparse);
        Ok(sparse)
    }

    pub fn is_sparse(&self, sexpr: &SetExpr) -> LowerResult<bool> {
        self.sparse
            .get(sexpr)
            .copied()
            .ok_or_else(|| LowerError::UnclassifiedNode(sexpr.clone()))
    }

    pub fn len(&self) -> usize {
        self.sparse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparse.is_empty()
    }
}

/// Dimensions of a space, split by role. Each array appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Split {
    /// Dimensions that drive the merge loop
    pub iterators: Vec<ArrayLevel>,
    /// Dimensions probed by coordinate
    pub locators: Vec<ArrayLevel>,
}

impl Split {
    fn push_iterator(&mut self, level: ArrayLevel) {
        self.locators.retain(|l| l.name != level.name);
        if !self.iterators.iter().any(|i| i.name == level.name) {
            self.iterators.push(level);
        }
    }

    fn push_locator(&mut self, level: ArrayLevel) {
        let known = self.iterators.iter().chain(&self.locators).any(|l| l.name == level.name);
        if !known {
            self.locators.push(level);
        }
    }
}

#[derive(Clone, Copy, Default)]
struct Context {
    under_intersection: bool,
    under_dense_union: bool,
}

/// Classify every leaf of `sexpr` as an iterator or a locator.
///
/// A leaf is a locator iff it is dense and lies under an intersection or under
/// a union the sparsity pass classified as dense. An array reached both ways
/// is kept once, as an iterator.
pub fn split_iterators_locators(sexpr: &SetExpr, formats: &FormatMap) -> LowerResult<Split> {
    let sparsity = SparsityMap::build(sexpr, formats)?;
    let mut split = Split::default();
    classify(sexpr, Context::default(), &sparsity, formats, &mut split)?;
    Ok(split)
}

fn classify(
    sexpr: &SetExpr,
    ctx: Context,
    sparsity: &SparsityMap,
    formats: &FormatMap,
    out: &mut Split,
) -> LowerResult<()> {
    match sexpr {
        SetExpr::ArrayDim(access) => {
            let level = ArrayLevel::from_access(access, formats)?;
            let dense = !sparsity.is_sparse(sexpr)?;
            if dense && (ctx.under_intersection || ctx.under_dense_union) {
                out.push_locator(level);
            } else {
                out.push_iterator(level);
            }
        }
        SetExpr::Intersection(a, b) => {
            let inner = Context {
                under_intersection: true,
                ..ctx
            };
            classify(a, inner, sparsity, formats, out)?;
            classify(b, inner, sparsity, formats, out)?;
        }
        SetExpr::Union(a, b) => {
            let inner = if sparsity.is_sparse(sexpr)? {
                ctx
            } else {
                Context {
                    under_dense_union: true,
                    ..ctx
                }
            };
            classify(a, inner, sparsity, formats, out)?;
            classify(b, inner, sparsity, formats, out)?;
        }
    }
    Ok(())
}
