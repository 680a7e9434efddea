#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use sat_planner::planning::config::{
    DEFAULT_MAX_HORIZON, DEFAULT_TIMEOUT, DEFAULT_WEIGHT, SatConfig, SearchConfig,
};
use sat_planner::planning::encoding::encode;
use sat_planner::planning::heuristic::HeuristicType;
use sat_planner::planning::parser::parse_problem_file;
use sat_planner::planning::plan::PlanOutcome;
use sat_planner::planning::problem::Problem;
use sat_planner::planning::sat_plan::{SatStats, solve_plan_via_sat};
use sat_planner::planning::search::{SearchStats, search_plan_with};
use sat_planner::sat::dimacs::write_dimacs_file;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing_subscriber::EnvFilter;

/// File extension of problems picked up by `dir`.
pub(crate) const PROBLEM_EXTENSION: &str = "strips";

/// Defines the command-line interface for the planner.
#[derive(Parser, Debug)]
#[command(
    name = "sat-planner",
    version,
    about = "A grounded classical planner: weighted A* and planning as SAT"
)]
pub(crate) struct Cli {
    /// A problem file to solve with forward search when no subcommand is given.
    pub problem: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub search: SearchOptions,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a problem with weighted A* forward search.
    Search {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        search: SearchOptions,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a problem by encoding it as CNF for increasing horizons.
    Sat {
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        sat: SatOptions,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.strips` file below a directory.
    Dir {
        #[arg(long)]
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = Strategy::Search)]
        strategy: Strategy,

        #[command(flatten)]
        search: SearchOptions,

        #[command(flatten)]
        sat: SatOptions,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Which planner `dir` runs on each problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum Strategy {
    #[default]
    Search,
    Sat,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SearchOptions {
    /// Goal-distance estimator guiding the search.
    #[arg(short = 'e', long, value_enum, default_value_t = HeuristicType::FastForward)]
    pub(crate) heuristic: HeuristicType,

    /// Weight of the estimate in `f = weight * h + g`. Must be positive.
    #[arg(short, long, default_value_t = DEFAULT_WEIGHT)]
    pub(crate) weight: f64,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SatOptions {
    /// Largest horizon tried before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_HORIZON)]
    pub(crate) max_horizon: usize,

    /// Write the CNF of the last horizon tried to `<problem>.cnf`.
    #[arg(long, default_value_t = false)]
    pub(crate) export_dimacs: bool,
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Time budget in seconds.
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub(crate) timeout: u64,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Re-simulate a found plan from the initial state.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,
}

impl CommonOptions {
    pub(crate) const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Installs the `tracing` subscriber, writing to stderr.
pub(crate) fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "debug" } else { "warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(path: &Path) -> Result<(Problem, Duration), String> {
    if !path.is_file() {
        return Err(format!("Problem file does not exist: {}", path.display()));
    }
    let time = Instant::now();
    let problem =
        parse_problem_file(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((problem, time.elapsed()))
}

/// Solves one problem file with weighted A*.
///
/// # Errors
///
/// If the file cannot be parsed, the options are invalid or the plan fails
/// verification.
pub(crate) fn solve_search(
    path: &Path,
    search: &SearchOptions,
    common: &CommonOptions,
) -> Result<(), String> {
    let (problem, parse_time) = load(path)?;
    println!("Solving: {}", path.display());

    let config = SearchConfig::new(search.weight, common.timeout()).map_err(|e| e.to_string())?;
    let _ = epoch::advance();
    let result =
        search_plan_with(&problem, search.heuristic, &config).map_err(|e| e.to_string())?;

    report_outcome(&problem, &result.outcome, common.verify)?;
    if common.stats {
        print_problem_stats(&problem, parse_time);
        print_search_stats(&result.stats, search);
    }
    Ok(())
}

/// Solves one problem file through the SAT encoding.
///
/// # Errors
///
/// If the file cannot be parsed, the options are invalid, the solver fails,
/// the DIMACS export cannot be written or the plan fails verification.
pub(crate) fn solve_sat(
    path: &Path,
    sat: &SatOptions,
    common: &CommonOptions,
) -> Result<(), String> {
    let (problem, parse_time) = load(path)?;
    println!("Solving: {}", path.display());

    let config = SatConfig::new(sat.max_horizon, common.timeout()).map_err(|e| e.to_string())?;
    let _ = epoch::advance();
    let result = solve_plan_via_sat(&problem, &config).map_err(|e| e.to_string())?;

    if sat.export_dimacs && result.stats.horizons > 0 {
        let encoding = encode(&problem, result.stats.last_horizon);
        let dimacs_path = PathBuf::from(format!("{}.cnf", path.display()));
        write_dimacs_file(encoding.cnf(), &dimacs_path)
            .map_err(|e| format!("Unable to write {}: {e}", dimacs_path.display()))?;
        println!("DIMACS written to: {}", dimacs_path.display());
    }

    report_outcome(&problem, &result.outcome, common.verify)?;
    if common.stats {
        print_problem_stats(&problem, parse_time);
        print_sat_stats(&result.stats);
    }
    Ok(())
}

/// Solves every problem file below `path`.
///
/// # Errors
///
/// If `path` is not a directory or any problem fails to solve.
pub(crate) fn solve_dir(
    path: &Path,
    strategy: Strategy,
    search: &SearchOptions,
    sat: &SatOptions,
    common: &CommonOptions,
) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path
            .extension()
            .is_none_or(|ext| ext != PROBLEM_EXTENSION)
        {
            eprintln!("Skipping non-problem file: {}", file_path.display());
            continue;
        }

        match strategy {
            Strategy::Search => solve_search(file_path, search, common)?,
            Strategy::Sat => solve_sat(file_path, sat, common)?,
        }
    }

    Ok(())
}

fn report_outcome(problem: &Problem, outcome: &PlanOutcome, verify: bool) -> Result<(), String> {
    match outcome {
        PlanOutcome::Found(plan) => {
            println!("\nPlan found ({} steps):", plan.len());
            print!("{}", plan.display(problem));
            if verify {
                let ok = plan.validate(problem).is_ok();
                println!("Verified: {ok}");
                if !ok {
                    return Err("Plan failed verification!".to_string());
                }
            }
        }
        PlanOutcome::NoPlan(reason) => println!("\nNo plan found: {reason}"),
    }
    Ok(())
}

fn memory_usage() -> (f64, f64) {
    const MIB: f64 = 1024.0 * 1024.0;
    let _ = epoch::advance();
    let allocated = stats::allocated::mib().and_then(|m| m.read()).unwrap_or(0);
    let resident = stats::resident::mib().and_then(|m| m.read()).unwrap_or(0);
    (allocated as f64 / MIB, resident as f64 / MIB)
}

/// Prints a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

fn print_problem_stats(problem: &Problem, parse_time: Duration) {
    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Fluents", problem.num_fluents());
    stat_line("Actions", problem.num_actions());
    stat_line("Goal literals", problem.goal().len());
}

fn print_footer(elapsed: Duration) {
    let (allocated, resident) = memory_usage();
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{:.3}", elapsed.as_secs_f64()));
    println!("=====================================================================");
}

fn print_search_stats(s: &SearchStats, options: &SearchOptions) {
    let elapsed_secs = s.elapsed.as_secs_f64();
    println!("========================[ Search Statistics ]========================");
    stat_line("Heuristic", options.heuristic);
    stat_line("Weight", options.weight);
    stat_line_with_rate("Expanded", s.expanded, elapsed_secs);
    stat_line_with_rate("Generated", s.generated, elapsed_secs);
    stat_line("Duplicates", s.duplicates);
    stat_line("Pruned", s.pruned);
    print_footer(s.elapsed);
}

fn print_sat_stats(s: &SatStats) {
    let elapsed_secs = s.elapsed.as_secs_f64();
    println!("=========================[ SAT Statistics ]==========================");
    stat_line("Horizons tried", s.horizons);
    stat_line("Last horizon", s.last_horizon);
    stat_line("Variables (last)", s.variables);
    stat_line("Clauses (last)", s.clauses);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Restarts", s.restarts, elapsed_secs);
    print_footer(s.elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_problem_defaults_to_search() {
        let cli = Cli::try_parse_from(["sat-planner", "light.strips", "-w", "2"]).unwrap();
        assert_eq!(cli.problem, Some(PathBuf::from("light.strips")));
        assert!(cli.command.is_none());
        assert!((cli.search.weight - 2.0).abs() < f64::EPSILON);
        assert_eq!(cli.search.heuristic, HeuristicType::FastForward);
        assert!(cli.common.verify);
    }

    #[test]
    fn test_sat_subcommand() {
        let cli = Cli::try_parse_from([
            "sat-planner",
            "sat",
            "--path",
            "p.strips",
            "--max-horizon",
            "7",
            "--export-dimacs",
            "--stats",
            "false",
        ])
        .unwrap();
        let Some(Commands::Sat { path, sat, common }) = cli.command else {
            panic!("expected the sat subcommand");
        };
        assert_eq!(path, PathBuf::from("p.strips"));
        assert_eq!(sat.max_horizon, 7);
        assert!(sat.export_dimacs);
        assert!(!common.stats);
        assert_eq!(common.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_dir_strategy() {
        let cli = Cli::try_parse_from([
            "sat-planner",
            "dir",
            "--path",
            "problems",
            "--strategy",
            "sat",
            "--heuristic",
            "max",
        ])
        .unwrap();
        let Some(Commands::Dir {
            strategy, search, ..
        }) = cli.command
        else {
            panic!("expected the dir subcommand");
        };
        assert_eq!(strategy, Strategy::Sat);
        assert_eq!(search.heuristic, HeuristicType::Max);
    }
}
