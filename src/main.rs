// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line front end for the Futoshiki solver.
//!
//! One binary drives all four runtimes via `--mode`; exit code 0 means a
//! solution was found, 1 means no solution or any input error.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};

use futoshiki_search::io::{read_puzzle_from_file, render_board};
use futoshiki_search::model::Puzzle;
use futoshiki_search::runtime::{solve, Mode, SolveOptions};
use futoshiki_search::solver::stats::render_comparison;
use futoshiki_search::solver::verify_solution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Plain sequential backtracking.
    Seq,
    /// Intra-node task pool.
    Threads,
    /// Master/worker unit exchange with sequential workers.
    Cluster,
    /// Master/worker exchange with a task pool inside each worker.
    Hybrid,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Seq => Mode::Sequential,
            ModeArg::Threads => Mode::Threads,
            ModeArg::Cluster => Mode::Cluster,
            ModeArg::Hybrid => Mode::Hybrid,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the puzzle file.
    puzzle: PathBuf,

    /// Which scheduling runtime drives the search.
    #[arg(long, value_enum, default_value_t = ModeArg::Threads)]
    mode: ModeArg,

    /// Disable the pre-coloring pass.
    #[arg(short = 'n', long = "no-precolor")]
    no_precolor: bool,

    /// Quiet: only warnings, errors and the result.
    #[arg(short = 'q', conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,

    /// Verbose: progress and task assignments.
    #[arg(short = 'v', conflicts_with = "debug")]
    verbose: bool,

    /// Debug: everything, including per-cell candidate dumps.
    #[arg(short = 'd')]
    debug: bool,

    /// Thread count for the intra-node pool (default: all cores, or
    /// RAYON_NUM_THREADS).
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Task-multiplier factor for the selected mode's distribution tier
    /// (default 4.0 intra-node, 1.0 inter-node).
    #[arg(short = 'f', long)]
    factor: Option<f64>,

    /// Hybrid only: task-multiplier factor for the inter-node tier.
    #[arg(long = "master-factor")]
    master_factor: Option<f64>,

    /// Hybrid only: task-multiplier factor for each worker's pool.
    #[arg(long = "pool-factor")]
    pool_factor: Option<f64>,

    /// Worker rank count for the inter-node tiers.
    #[arg(short = 'w', long, default_value_t = 4)]
    workers: usize,

    /// Solve twice, with and without pre-coloring, and compare.
    #[arg(long, conflicts_with = "no_precolor")]
    compare: bool,

    /// Independently re-check the reported solution against the puzzle.
    #[arg(long)]
    verify: bool,
}

fn configure_logging(args: &Args) {
    let level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level)
        .init();
}

/// Resolve the per-tier factors from `-f` and the hybrid-specific flags.
fn resolve_factors(args: &Args) -> Result<(f64, f64), String> {
    let (pool_factor, master_factor) = match args.mode {
        ModeArg::Hybrid => (
            args.pool_factor.or(args.factor).unwrap_or(4.0),
            args.master_factor.unwrap_or(1.0),
        ),
        ModeArg::Cluster => (4.0, args.factor.unwrap_or(1.0)),
        _ => (args.factor.unwrap_or(4.0), 1.0),
    };
    for factor in [pool_factor, master_factor] {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(format!("task factor must be positive, got {factor}"));
        }
    }
    Ok((pool_factor, master_factor))
}

fn solve_once(puzzle: &Puzzle, options: &SolveOptions) -> Result<futoshiki_search::SolveReport, String> {
    let mut working = puzzle.clone();
    solve(&mut working, options).map_err(|e| e.to_string())
}

fn run(args: &Args) -> Result<bool, String> {
    let (pool_factor, master_factor) = resolve_factors(args)?;
    let options = SolveOptions {
        mode: args.mode.into(),
        use_precoloring: !args.no_precolor,
        threads: args.threads,
        pool_factor,
        master_factor,
        workers: args.workers,
        ..Default::default()
    };

    let puzzle = read_puzzle_from_file(&args.puzzle).map_err(|e| e.to_string())?;

    info!("puzzle file: {}", args.puzzle.display());
    info!(
        "mode: {:?}, {} pre-coloring",
        args.mode,
        if options.use_precoloring { "with" } else { "without" }
    );

    if args.compare {
        let without = solve_once(
            &puzzle,
            &SolveOptions {
                use_precoloring: false,
                ..options.clone()
            },
        )?;
        let with = solve_once(&puzzle, &options)?;
        println!("{}", with.stats);
        println!("{}", render_comparison(&with.stats, &without.stats));
        return Ok(with.stats.found_solution && without.stats.found_solution);
    }

    println!("Initial puzzle:");
    println!("{}", render_board(&puzzle, &puzzle.seeded_grid()));

    let report = solve_once(&puzzle, &options)?;
    match &report.solution {
        Some(grid) => {
            println!("Solution:");
            println!("{}", render_board(&puzzle, grid));
            if args.verify {
                verify_solution(&puzzle, grid)
                    .map_err(|v| format!("reported solution is invalid: {v}"))?;
                info!("solution verified");
            }
        }
        None => println!("No solution found."),
    }
    println!("{}", report.stats);

    Ok(report.stats.found_solution)
}

fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(&args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}
