//! Pretty-printer for index notation, set expressions and loop IR.
//!
//! Renders every tree as deterministic, human-readable text. Loop IR uses
//! C-like syntax: a compressed level `A` walks cursor `pA` and loads
//! coordinate `iA`; a dense level is addressed by the merged coordinate `i`.

use std::fmt;

use crate::expr::{Access, Expr, IndexStmt};
use crate::format::Format;
use crate::lir::{ArrayLevel, IteratorSet, LExpr, Stmt};
use crate::set_expr::SetExpr;

/// Name of the single free index.
const INDEX: &str = "i";

/// Pretty-print configuration
pub struct PrettyConfig {
    pub indent: usize,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// A pretty-printer with indentation tracking
pub struct Pretty {
    output: String,
    indent_level: usize,
    config: PrettyConfig,
}

impl Default for Pretty {
    fn default() -> Self {
        Self::new()
    }
}

impl Pretty {
    pub fn new() -> Self {
        Self::with_config(PrettyConfig::default())
    }

    pub fn with_config(config: PrettyConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            config,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn indent(&mut self) {
        for _ in 0..(self.indent_level * self.config.indent) {
            self.output.push(' ');
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Write one indented line.
    fn line(&mut self, s: &str) {
        self.indent();
        self.write(s);
        self.write("\n");
    }

    fn inc_indent(&mut self) {
        self.indent_level += 1;
    }

    fn dec_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }
}

// ============ Loop IR ============

fn cursor(level: &ArrayLevel) -> String {
    format!("p{}", level.name)
}

/// Coordinate a level currently sits on.
fn coordinate(level: &ArrayLevel) -> String {
    match level.format {
        Format::Compressed => format!("i{}", level.name),
        Format::Dense => cursor(level),
    }
}

fn bound(level: &ArrayLevel) -> String {
    match level.format {
        Format::Compressed => format!("{} < {}_end", cursor(level), level.name),
        Format::Dense => format!("{} < {}_size", cursor(level), level.name),
    }
}

fn matches_index(level: &ArrayLevel) -> String {
    format!("{} == {}", coordinate(level), INDEX)
}

fn conjunction(set: &IteratorSet, clause: fn(&ArrayLevel) -> String) -> String {
    if set.is_empty() {
        return "true".to_string();
    }
    set.iter().map(clause).collect::<Vec<_>>().join(" && ")
}

fn lexpr_text(e: &LExpr, out: &mut String) {
    match e {
        LExpr::ArrayAccess(level) => match level.format {
            Format::Compressed => out.push_str(&format!("{}[{}]", level.name, cursor(level))),
            Format::Dense => out.push_str(&format!("{}[{}]", level.name, INDEX)),
        },
        LExpr::Add(a, b) => {
            lexpr_text(a, out);
            out.push_str(" + ");
            lexpr_text(b, out);
        }
        LExpr::Mul(a, b) => {
            lexpr_atom(a, out);
            out.push_str(" * ");
            lexpr_atom(b, out);
        }
    }
}

/// Print an operand of a product, parenthesizing sums
fn lexpr_atom(e: &LExpr, out: &mut String) {
    match e {
        LExpr::Add(_, _) => {
            out.push('(');
            lexpr_text(e, out);
            out.push(')');
        }
        _ => lexpr_text(e, out),
    }
}

impl Pretty {
    pub fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::SequenceStmt(stmts) => {
                for s in stmts {
                    self.stmt(s);
                }
            }
            Stmt::IteratorDefinition(set) => {
                for level in set.iter() {
                    let init = match level.format {
                        Format::Compressed => format!("{} = {}_begin;", cursor(level), level.name),
                        Format::Dense => format!("{} = 0;", cursor(level)),
                    };
                    self.line(&init);
                }
            }
            Stmt::CompressedIndexDefinition(level) => {
                self.line(&format!(
                    "{} = {}_crd[{}];",
                    coordinate(level),
                    level.name,
                    cursor(level)
                ));
            }
            Stmt::LogicalIndexDefinition(set) => {
                let coords: Vec<String> = set.iter().map(coordinate).collect();
                let merged = match coords.as_slice() {
                    [only] => only.clone(),
                    _ => format!("min({})", coords.join(", ")),
                };
                self.line(&format!("{} = {};", INDEX, merged));
            }
            Stmt::ArrayAssignment { lhs, rhs } => {
                let mut text = format!("{}[{}] = ", lhs.name, INDEX);
                lexpr_text(rhs, &mut text);
                text.push(';');
                self.line(&text);
            }
            Stmt::IfStmt { branches } => {
                for (n, (cond, body)) in branches.iter().enumerate() {
                    let keyword = if n == 0 { "if" } else { "} else if" };
                    self.line(&format!("{} ({}) {{", keyword, conjunction(cond, matches_index)));
                    self.inc_indent();
                    self.stmt(body);
                    self.dec_indent();
                }
                if !branches.is_empty() {
                    self.line("}");
                }
            }
            Stmt::WhileStmt { cond, body } => {
                self.line(&format!("while ({}) {{", conjunction(cond, bound)));
                self.inc_indent();
                self.stmt(body);
                self.dec_indent();
                self.line("}");
            }
            Stmt::IncrementIterator {
                level,
                unconditional,
            } => {
                if *unconditional {
                    self.line(&format!("{}++;", cursor(level)));
                } else {
                    self.line(&format!("if ({}) {}++;", matches_index(level), cursor(level)));
                }
            }
        }
    }
}

/// Render loop IR with two-space indentation.
pub fn pretty_print(stmt: &Stmt) -> String {
    let mut p = Pretty::new();
    p.stmt(stmt);
    p.finish()
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_print(self))
    }
}

impl fmt::Display for LExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        lexpr_text(self, &mut out);
        f.write_str(&out)
    }
}

impl fmt::Display for ArrayLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.format {
            Format::Dense => "d",
            Format::Compressed => "c",
        };
        write!(f, "{}:{}", self.name, tag)
    }
}

impl fmt::Display for IteratorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (n, level) in self.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", level)?;
        }
        f.write_str("}")
    }
}

// ============ Index notation ============

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, INDEX)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::ArrayRead(access) => write!(f, "{}", access),
            Expr::Add(a, b) => write!(f, "{} + {}", a, b),
            Expr::Mul(a, b) => {
                fmt_factor(a, f)?;
                f.write_str(" * ")?;
                fmt_factor(b, f)
            }
        }
    }
}

/// Print an operand of a product, parenthesizing sums
fn fmt_factor(e: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match e {
        Expr::Add(_, _) => write!(f, "({})", e),
        _ => write!(f, "{}", e),
    }
}

impl fmt::Display for IndexStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexStmt::ArrayAssignment { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            IndexStmt::ForAll { sexpr, body } => write!(f, "forall {} in {}: {}", INDEX, sexpr, body),
        }
    }
}

impl fmt::Display for SetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetExpr::ArrayDim(access) => f.write_str(&access.name),
            SetExpr::Union(a, b) => write!(f, "({} ∪ {})", a, b),
            SetExpr::Intersection(a, b) => write!(f, "({} ∩ {})", a, b),
        }
    }
}

// Unit tests live in tests/unit_pretty.rs
