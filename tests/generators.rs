//! Proptest generators for coiter data structures
//!
//! Provides `Strategy` implementations for generating right-hand sides and
//! format tables used in property tests.

#![allow(dead_code)]

use coiter::{Expr, Format, FormatMap, SetExpr};
use proptest::collection::vec;
use proptest::prelude::*;

/// Arrays a generated right-hand side may read
pub const INPUTS: [&str; 4] = ["A", "B", "D", "E"];

/// Array every generated assignment writes
pub const OUTPUT: &str = "C";

// ============================================================================
// Formats
// ============================================================================

pub fn arb_format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Dense), Just(Format::Compressed)]
}

/// A format for every input array and the output array
pub fn arb_formats() -> impl Strategy<Value = FormatMap> {
    vec(arb_format(), INPUTS.len() + 1).prop_map(|formats| {
        INPUTS
            .iter()
            .chain(std::iter::once(&OUTPUT))
            .copied()
            .zip(formats)
            .collect()
    })
}

/// Every array compressed
pub fn all_compressed() -> FormatMap {
    INPUTS
        .iter()
        .chain(std::iter::once(&OUTPUT))
        .map(|&n| (n, Format::Compressed))
        .collect()
}

// ============================================================================
// Expressions
// ============================================================================

pub fn arb_read() -> impl Strategy<Value = Expr> {
    prop::sample::select(INPUTS.to_vec()).prop_map(Expr::read)
}

/// Sums and products over the input arrays, at most 16 reads
pub fn arb_expr() -> impl Strategy<Value = Expr> {
    arb_read().prop_recursive(4, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            (inner.clone(), inner).prop_map(|(a, b)| a * b),
        ]
    })
}

pub fn arb_set_expr() -> impl Strategy<Value = SetExpr> {
    arb_expr().prop_map(|e| SetExpr::of_expr(&e))
}
