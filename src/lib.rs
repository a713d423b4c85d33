//! Coiter: co-iteration lowering for sparse and dense arrays
//!
//! Turns an index-notation assignment over one free index, such as
//! `C(i) = A(i) + A(i) * B(i)`, into a loop program that walks arrays stored in
//! different formats together.
//!
//! # Pipeline
//!
//! 1. **Phase 1** ([`lower_assignment`]): derive the iteration space of the
//!    right-hand side as a [`SetExpr`] (sums become unions, products become
//!    intersections) and wrap the assignment in a `ForAll`.
//! 2. **Merge lattice** ([`MergeLattice`]): enumerate every combination of
//!    iterators that can be live at one coordinate, splitting dimensions into
//!    loop-driving iterators and coordinate-probed locators.
//! 3. **Phase 2** ([`lower_index_stmt`]): emit one while-loop per lattice point,
//!    each merging its iterators' coordinates and dispatching to the most
//!    specific assignment that applies.
//!
//! ```
//! use coiter::{lower, Assignment, Expr, Format, FormatMap};
//!
//! let formats: FormatMap = [("A", Format::Compressed), ("B", Format::Compressed), ("C", Format::Dense)]
//!     .into_iter()
//!     .collect();
//! let program = lower(&Assignment::new("C", Expr::read("A") + Expr::read("B")), &formats).unwrap();
//! assert_eq!(program.while_loops().len(), 3);
//! ```

pub mod error;
pub mod expr;
pub mod format;
pub mod gather;
pub mod lattice;
pub mod lir;
pub mod lower;
pub mod pretty;
pub mod set_expr;

pub use error::{LowerError, LowerResult};
pub use expr::{Access, Assignment, Expr, IndexStmt};
pub use format::{Format, FormatMap};
pub use gather::{gather_iterator_set, gather_iterator_set_all};
pub use lattice::{MergeLattice, MergePoint, PointId};
pub use lir::{ArrayLevel, IteratorSet, LExpr, Stmt};
pub use lower::{lower, lower_assignment, lower_index_stmt};
pub use pretty::pretty_print;
pub use set_expr::{SetExpr, Simplified};
