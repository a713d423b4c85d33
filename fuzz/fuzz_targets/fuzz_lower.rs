//! Fuzz lowering
//!
//! Builds arbitrary sums and products over a small set of arrays with
//! arbitrary formats. Lowering must either succeed or return an error; it
//! must never panic.

#![no_main]

use arbitrary::Arbitrary;
use coiter::{lower, pretty_print, Assignment, Expr, Format, FormatMap};
use libfuzzer_sys::fuzz_target;

/// `Z` is never given a format
const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "Z"];
const MAX_DEPTH: usize = 12;

#[derive(Arbitrary, Debug)]
enum FuzzExpr {
    Read(u8),
    Add(Box<FuzzExpr>, Box<FuzzExpr>),
    Mul(Box<FuzzExpr>, Box<FuzzExpr>),
}

impl FuzzExpr {
    fn to_expr(&self, depth: usize) -> Expr {
        let name = |n: u8| NAMES[n as usize % NAMES.len()];
        match self {
            FuzzExpr::Read(n) => Expr::read(name(*n)),
            FuzzExpr::Add(a, _) | FuzzExpr::Mul(a, _) if depth >= MAX_DEPTH => a.to_expr(depth + 1),
            FuzzExpr::Add(a, b) => a.to_expr(depth + 1) + b.to_expr(depth + 1),
            FuzzExpr::Mul(a, b) => a.to_expr(depth + 1) * b.to_expr(depth + 1),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    rhs: FuzzExpr,
    output: u8,
    dense: [bool; 5],
}

fuzz_target!(|input: FuzzInput| {
    let formats: FormatMap = NAMES[..5]
        .iter()
        .zip(input.dense)
        .map(|(&n, dense)| (n, if dense { Format::Dense } else { Format::Compressed }))
        .collect();
    let output = NAMES[input.output as usize % NAMES.len()];
    let assignment = Assignment::new(output, input.rhs.to_expr(0));

    if let Ok(program) = lower(&assignment, &formats) {
        assert!(!program.while_loops().is_empty());
        let _ = pretty_print(&program);
    }
});
