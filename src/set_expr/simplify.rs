//! Iterator removal.
//!
//! Removing an iterator answers "what is left to visit once this iterator can
//! no longer contribute?". An exhausted compressed cursor contributes nothing
//! more, so its leaf becomes the empty set. A dense dimension covers every
//! coordinate, so its leaf becomes the universal set.

use std::rc::Rc;

use crate::lir::ArrayLevel;

use super::SetExpr;

/// Result of removing an iterator from a set expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Simplified {
    /// A remaining space with at least one leaf
    Node(SetExpr),
    /// Nothing left to visit
    Empty,
    /// No constraint left
    Universal,
}

impl Simplified {
    pub fn is_empty(&self) -> bool {
        matches!(self, Simplified::Empty)
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Simplified::Universal)
    }

    pub fn node(self) -> Option<SetExpr> {
        match self {
            Simplified::Node(sexpr) => Some(sexpr),
            Simplified::Empty | Simplified::Universal => None,
        }
    }
}

/// Remove `removed` from `sexpr`.
///
/// - `Union`: universal absorbs (the other operand is not visited), empty is
///   the identity.
/// - `Intersection`: any operand that did not resolve to a node makes the
///   whole intersection empty. A removed dense operand therefore also empties
///   an intersection instead of acting as its identity.
///
/// Leaves are matched by array name. Removing an array that does not occur
/// returns the input unchanged.
pub fn simplify(sexpr: &SetExpr, removed: &ArrayLevel) -> Simplified {
    match sexpr {
        SetExpr::ArrayDim(access) => {
            if access.name != removed.name {
                Simplified::Node(sexpr.clone())
            } else if removed.format.is_compressed() {
                Simplified::Empty
            } else {
                Simplified::Universal
            }
        }
        SetExpr::Union(a, b) => {
            let a = match simplify(a, removed) {
                Simplified::Universal => return Simplified::Universal,
                other => other,
            };
            let b = match simplify(b, removed) {
                Simplified::Universal => return Simplified::Universal,
                other => other,
            };
            match (a, b) {
                (Simplified::Node(a), Simplified::Node(b)) => {
                    Simplified::Node(SetExpr::Union(Rc::new(a), Rc::new(b)))
                }
                (Simplified::Node(a), _) => Simplified::Node(a),
                (_, Simplified::Node(b)) => Simplified::Node(b),
                _ => Simplified::Empty,
            }
        }
        SetExpr::Intersection(a, b) => {
            let Simplified::Node(a) = simplify(a, removed) else {
                return Simplified::Empty;
            };
            let Simplified::Node(b) = simplify(b, removed) else {
                return Simplified::Empty;
            };
            Simplified::Node(SetExpr::Intersection(Rc::new(a), Rc::new(b)))
        }
    }
}
