#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # ycc-grader
//!
//! Grades a compiler course submission (`.jar` or `.zip`) against a
//! directory of test programs and gold records, then prints an overview of
//! the grades.
//!
//! ```text
//! ycc-grader lex --code public/code/lex --gold public/golden/lex solution.jar
//! ycc-grader interpret --code public/code/ir solution.jar
//! ```
//!
//! The environment (or a `.env` file) may set `YCC_JAVA`,
//! `YCC_TIMEOUT_SECS`, `YCC_JOBS` and `YCC_LEX_SCORING`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use owo_colors::OwoColorize;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};
use ycc_grader::{
    config,
    grade::{GradeResult, overview_table},
    harness::{Assignment, grade_submission},
};

/// Arguments shared by every assignment subcommand.
#[derive(Debug, Clone)]
struct Args {
    /// What is being graded
    assignment: Assignment,
    /// Directory of test programs
    code:       PathBuf,
    /// Directory of gold records
    gold:       Option<PathBuf>,
    /// Where the submission's records are written
    out:        Option<PathBuf>,
    /// Print summaries as JSON
    json:       bool,
    /// Print every report's detail
    detail:     bool,
    /// Log at debug level
    verbose:    bool,
    /// The submitted compiler
    submission: PathBuf,
}

/// Parse the command line arguments and return the `Args` struct
fn options() -> Args {
    /// parses the arguments of one assignment subcommand
    fn grade_args(assignment: Assignment) -> impl Parser<Args> {
        let assignment = pure(assignment);
        let code = long("code")
            .help("Directory of test programs")
            .argument::<PathBuf>("DIR");
        let gold = long("gold")
            .help("Directory of gold records")
            .argument::<PathBuf>("DIR")
            .optional();
        let out = long("out")
            .help("Where to write the submission's records (defaults to its directory)")
            .argument::<PathBuf>("DIR")
            .optional();
        let json = long("json").help("Print summaries as JSON").switch();
        let detail = long("detail").help("Print each report in full").switch();
        let verbose = short('v').long("verbose").help("Log debug output").switch();
        let submission = positional::<PathBuf>("SUBMISSION").help("The .jar or .zip to grade");

        construct!(Args {
            assignment,
            code,
            gold,
            out,
            json,
            detail,
            verbose,
            submission
        })
    }

    let lex = grade_args(Assignment::Lex)
        .to_options()
        .command("lex")
        .help("Grade a lexer by its token streams");
    let parse = grade_args(Assignment::Parse)
        .to_options()
        .command("parse")
        .help("Grade a parser by its syntax trees");
    let ty = grade_args(Assignment::Type)
        .to_options()
        .command("type")
        .help("Grade a type checker by its typed trees");
    let cs = grade_args(Assignment::Cs)
        .to_options()
        .command("cs")
        .help("Grade control-structure analysis");
    let name = grade_args(Assignment::Name)
        .to_options()
        .command("name")
        .help("Grade name resolution");
    let semantic = grade_args(Assignment::Semantic)
        .to_options()
        .command("semantic")
        .help("Grade control structure, name resolution and type checking together");
    let interpret = grade_args(Assignment::Interpret)
        .to_options()
        .command("interpret")
        .help("Grade an interpreter by the output of test programs");

    construct!([lex, parse, ty, cs, name, semantic, interpret])
        .to_options()
        .descr("Autograder for compiler course assignments")
        .run()
}

/// Directory the submission's records go to when `--out` is not given.
fn default_out_root(submission: &Path) -> PathBuf {
    match submission.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args = options();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let config = config::ensure_initialized()?;
    let out_root = args
        .out
        .clone()
        .unwrap_or_else(|| default_out_root(&args.submission));

    let reports = grade_submission(
        args.assignment,
        &args.submission,
        &args.code,
        args.gold.as_deref(),
        &out_root,
        &config,
    )
    .await
    .with_context(|| format!("Failed to grade {}", args.submission.display()))?;

    if args.json {
        let summaries: Vec<GradeResult> = reports.iter().map(|r| r.summary()).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("Failed to serialize summaries")?
        );
        return Ok(());
    }

    if args.detail {
        for report in &reports {
            if report.is_error() {
                println!("{}", report.name().red().bold());
            } else {
                println!("{}", report.name().bold());
            }
            println!("{}\n", report.detail());
        }
    }
    println!("{}", overview_table(&reports));

    Ok(())
}
