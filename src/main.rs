//! # sat-planner
//!
//! Command-line front end for the planner. Problems are read in the grounded
//! text format of `sat_planner::planning::parser` and solved either by weighted
//! A* forward search or by planning as satisfiability.
//!
//! ```sh
//! # forward search with the default heuristic
//! sat-planner problem.strips
//!
//! # admissible search, optimal plans
//! sat-planner search --path problem.strips --heuristic max --weight 1
//!
//! # shortest plan via SAT, keeping the CNF of the last horizon
//! sat-planner sat --path problem.strips --max-horizon 30 --export-dimacs
//!
//! # every .strips file below a directory
//! sat-planner dir --path problems/ --strategy sat
//! ```
//!
//! Common options: `--timeout <secs>`, `--debug`, `--verify <bool>`,
//! `--stats <bool>`. `RUST_LOG` overrides the log level.

mod command_line;

use crate::command_line::cli::{
    Cli, Commands, init_logging, solve_dir, solve_sat, solve_search,
};
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// statistics in the report.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Search {
            path,
            search,
            common,
        }) => {
            init_logging(common.debug);
            solve_search(&path, &search, &common)
        }
        Some(Commands::Sat { path, sat, common }) => {
            init_logging(common.debug);
            solve_sat(&path, &sat, &common)
        }
        Some(Commands::Dir {
            path,
            strategy,
            search,
            sat,
            common,
        }) => {
            init_logging(common.debug);
            solve_dir(&path, strategy, &search, &sat, &common)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => match cli.problem {
            Some(path) => {
                init_logging(cli.common.debug);
                solve_search(&path, &cli.search, &cli.common)
            }
            None => Err("No command provided. Use --help for more information.".to_string()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
