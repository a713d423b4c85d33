//! Lowering error types.

use crate::set_expr::SetExpr;

/// Errors raised while building merge lattices or lowering statements.
///
/// The first group are structural: they indicate a tree that was not built
/// through the constructors in this crate. The second group are semantic
/// misuse by the caller and are expected in practice.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// A statement was not the variant the operation requires
    #[error("expected {expected} statement, found {found}")]
    UnexpectedStatement {
        expected: &'static str,
        found: &'static str,
    },
    /// The classification pass met a node it never assigned a sparsity to
    #[error("set expression {0} missing from sparsity map")]
    UnclassifiedNode(SetExpr),
    /// Projecting a body onto a set expression dropped every term
    #[error("body projection onto {0} left no terms")]
    EmptyProjection(SetExpr),
    /// Classification produced neither iterators nor locators
    #[error("iteration space has no dimensions to iterate")]
    EmptySpace,

    /// The format table has no entry for an array
    #[error("unknown array '{0}' in format table")]
    UnknownArray(String),
    /// The format table entry for an array lists no dimensions
    #[error("array '{0}' has no dimension formats")]
    NoDimensions(String),
    /// An array was assigned to more than once in one statement
    #[error("array '{0}' is written more than once")]
    DuplicateWrite(String),
    /// An array was read after being assigned to in the same statement
    #[error("array '{0}' is read after being written")]
    ReadAfterWrite(String),
}

impl LowerError {
    /// True for errors caused by how the caller used the API rather than a malformed tree.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            LowerError::UnknownArray(_)
                | LowerError::NoDimensions(_)
                | LowerError::DuplicateWrite(_)
                | LowerError::ReadAfterWrite(_)
        )
    }
}

pub type LowerResult<T> = Result<T, LowerError>;
