//! coiter - lower example index-notation assignments and print the loop IR
//!
//! Usage: coiter [--example <name> | --all] [--formats <file.json>] [--format NAME=FORMAT]...
//!
//! Every array defaults to compressed (the `mixed` example keeps `D` dense).
//! A JSON table given with `--formats` overrides the defaults and each
//! `--format` flag overrides both. Set `RUST_LOG=coiter=debug` to trace
//! lattice construction.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use coiter::{lower_assignment, lower_index_stmt, Assignment, Expr, Format, FormatMap};

#[derive(Parser, Debug)]
#[command(name = "coiter", version, about = "Lower sparse/dense index notation to co-iteration loops")]
struct Args {
    /// Assignment to lower
    #[arg(short, long, value_enum, default_value_t = Example::APlusATimesB)]
    example: Example,

    /// Lower every example in turn
    #[arg(long, conflicts_with = "example")]
    all: bool,

    /// JSON format table, e.g. {"A": ["compressed"], "B": ["dense"]}
    #[arg(long = "formats", value_name = "FILE")]
    formats_file: Option<PathBuf>,

    /// Format of one array, e.g. B=dense (repeatable)
    #[arg(short = 'f', long = "format", value_name = "NAME=FORMAT", value_parser = parse_format_entry)]
    overrides: Vec<(String, Format)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Example {
    /// C(i) = A(i)
    A,
    /// C(i) = A(i) + B(i)
    APlusB,
    /// C(i) = A(i) * B(i)
    ATimesB,
    /// C(i) = A(i) + A(i) * B(i)
    APlusATimesB,
    /// C(i) = A(i) * D(i) + B(i), D dense
    Mixed,
}

impl Example {
    fn assignment(self) -> Assignment {
        let a = || Expr::read("A");
        let b = || Expr::read("B");
        let rhs = match self {
            Example::A => a(),
            Example::APlusB => a() + b(),
            Example::ATimesB => a() * b(),
            Example::APlusATimesB => a() + a() * b(),
            Example::Mixed => a() * Expr::read("D") + b(),
        };
        Assignment::new("C", rhs)
    }

    fn default_formats(self) -> FormatMap {
        let mut formats: FormatMap = ["A", "B", "C"]
            .into_iter()
            .map(|n| (n, Format::Compressed))
            .collect();
        if self == Example::Mixed {
            formats.insert("D", [Format::Dense]);
        }
        formats
    }
}

fn parse_format_entry(s: &str) -> Result<(String, Format), String> {
    let (name, format) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FORMAT, got '{}'", s))?;
    if name.is_empty() {
        return Err("array name must not be empty".to_string());
    }
    Ok((name.to_string(), format.parse()?))
}

fn load_formats(example: Example, args: &Args) -> Result<FormatMap, String> {
    let mut formats = example.default_formats();
    if let Some(path) = &args.formats_file {
        let file = File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
        let table = FormatMap::from_json_reader(file)
            .map_err(|e| format!("invalid format table {}: {}", path.display(), e))?;
        formats.merge(table);
    }
    for (name, format) in &args.overrides {
        formats.insert(name.clone(), [*format]);
    }
    Ok(formats)
}

fn run(example: Example, args: &Args) -> Result<(), String> {
    let formats = load_formats(example, args)?;
    let assignment = example.assignment();
    println!("{} = {}", assignment.access, assignment.rhs);

    let stmt = lower_assignment(&assignment);
    println!("{}", stmt);

    let program = lower_index_stmt(&stmt, &formats).map_err(|e| e.to_string())?;
    println!("{}", program);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let examples = if args.all {
        Example::value_variants().to_vec()
    } else {
        vec![args.example]
    };

    for example in examples {
        if let Err(e) = run(example, &args) {
            error!(?example, "lowering failed: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
