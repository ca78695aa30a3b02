mod result;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::error;
use log::info;
use log::Level;
use log::LevelFilter;

use presto_solver::model::Machine;
use presto_solver::search::greedy_upper_bound;
use presto_solver::search::minimum_presses;
use presto_solver::search::GreedyOptions;
use presto_solver::search::SearchStrategy;
use presto_solver::simplification::simplify;
use presto_solver::simplification::Simplification;
use presto_solver::statistics::configure_statistic_logging;
use presto_solver::statistics::log_statistic;
use presto_solver::statistics::should_log_statistics;
use presto_solver::statistics::SearchStatistics;

use result::PrestoError;
use result::PrestoResult;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The instance file to solve: one machine per line, written as an
    /// optional bracketed indicator token, one parenthesised counter-index
    /// list per button, and a brace-delimited target vector.
    #[arg(default_value = "inputs/machines.txt")]
    instance_path: PathBuf,

    /// The search strategy used to prove optimality.
    #[arg(
        long = "search-strategy",
        value_enum,
        default_value_t = SearchStrategy::BranchAndBound
    )]
    search_strategy: SearchStrategy,

    /// The number of seeded randomized greedy trials per instance.
    #[arg(long = "greedy-trials", default_value_t = 5000)]
    greedy_trials: u32,

    /// The base random seed for the greedy trials. Trial i uses seed + i.
    #[arg(short = 'r', long = "random-seed", default_value_t = 42)]
    random_seed: u64,

    /// Enables log message output from the solver
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,

    /// Enables logging of statistics from the solver
    #[arg(short = 's', long = "log-statistics", default_value_t = false)]
    log_statistics: bool,

    /// If `--verbose` is enabled removes the timestamp information from the
    /// log messages
    #[arg(long = "omit-timestamp", default_value_t = false)]
    omit_timestamp: bool,

    /// If `--verbose` is enabled removes the call site information from the
    /// log messages. Call site is the file and line in it that originated
    /// the message.
    #[arg(long = "omit-call-site", default_value_t = false)]
    omit_call_site: bool,
}

fn configure_logging(
    verbose: bool,
    log_statistics: bool,
    omit_timestamp: bool,
    omit_call_site: bool,
) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging("%%stat", None, None);
    }

    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            if record.level() != Level::Info && !omit_timestamp {
                write!(buf, "{} ", buf.timestamp())?;
            }
            write!(buf, "{} ", record.level())?;
            if record.level() != Level::Info && !omit_call_site {
                write!(
                    buf,
                    "[{}:{}] ",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> PrestoResult<()> {
    let args = Args::parse();

    configure_logging(
        args.verbose,
        args.log_statistics,
        args.omit_timestamp,
        args.omit_call_site,
    )?;

    let contents = fs::read_to_string(&args.instance_path).map_err(|e| {
        PrestoError::FileReadingError(e, args.instance_path.display().to_string())
    })?;

    let greedy_options = GreedyOptions {
        randomized_trials: args.greedy_trials,
        seed: args.random_seed,
        ..GreedyOptions::default()
    };

    let mut grand_total: u64 = 0;
    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let machine = Machine::parse(line).map_err(|source| PrestoError::InvalidInstance {
            line: line_number,
            source,
        })?;

        let Simplification { presses, machine } = simplify(machine);

        let greedy_start = Instant::now();
        let upper_bound = greedy_upper_bound(&machine, &greedy_options);
        let greedy_time = greedy_start.elapsed();

        let search_start = Instant::now();
        let mut statistics = SearchStatistics::default();
        let optimal = minimum_presses(
            &machine,
            upper_bound,
            args.search_strategy,
            &mut statistics,
        );
        let search_time = search_start.elapsed();

        let total = presses + optimal;
        info!(
            "instance {line_number}: {total} presses \
             (simplification {presses}, greedy {upper_bound:?} in {greedy_time:?}, \
             search {optimal} in {search_time:?})"
        );
        if should_log_statistics() {
            log_statistic("instance", line_number);
            log_statistic("presses", total);
            statistics.log();
        }

        grand_total += total;
    }

    println!("{grand_total}");
    Ok(())
}
