// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{DateTime, Utc};
use clap::{Arg, ArgAction, Command};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tour_plan_model::problem::loader::ProblemLoader;
use tour_plan_solver::engine::{LocalSearchMode, MovnsDriver, SolverConfig, SolverError};
use tour_plan_solver::report;
use tracing_subscriber::EnvFilter;

const EXIT_OK: i32 = 0;
const EXIT_INVALID_CONFIG: i32 = 2;
const EXIT_MISSING_DATA: i32 = 3;
const EXIT_NO_FEASIBLE_SEED: i32 = 4;

const ATTRACTIONS_ARG: &str = "attractions";
const HOTELS_ARG: &str = "hotels";
const MATRIX_DIR_ARG: &str = "matrix-dir";
const OUT_DIR_ARG: &str = "out-dir";
const INITIAL_ARG: &str = "initial-solutions";
const ARCHIVE_MAX_ARG: &str = "archive-max";
const K_MAX_ARG: &str = "k-max";
const TIME_ARG: &str = "max-time-seconds";
const ITERATIONS_ARG: &str = "max-iterations";
const IDLE_ARG: &str = "idle-limit";
const MODE_ARG: &str = "local-search";
const SEED_ARG: &str = "seed";
const SNAPSHOT_ARG: &str = "snapshot-every";

fn get_app() -> Command {
    Command::new("tour-plan")
        .about("Plans two-day tourist itineraries with multi-objective VNS")
        .arg(
            Arg::new(ATTRACTIONS_ARG)
                .help("Path to the attraction catalog")
                .long(ATTRACTIONS_ARG)
                .short('a')
                .default_value("places/attractions.csv"),
        )
        .arg(
            Arg::new(HOTELS_ARG)
                .help("Path to the hotel catalog")
                .long(HOTELS_ARG)
                .short('H')
                .default_value("places/hotels.csv"),
        )
        .arg(
            Arg::new(MATRIX_DIR_ARG)
                .help("Directory holding walk.csv, subway.csv, bus.csv and car.csv")
                .long(MATRIX_DIR_ARG)
                .short('m')
                .default_value("places/matrices"),
        )
        .arg(
            Arg::new(OUT_DIR_ARG)
                .help("Directory for result files")
                .long(OUT_DIR_ARG)
                .short('o')
                .default_value("results"),
        )
        .arg(
            Arg::new(INITIAL_ARG)
                .help("Number of seed solutions to construct")
                .long(INITIAL_ARG)
                .short('n')
                .default_value("4"),
        )
        .arg(
            Arg::new(ARCHIVE_MAX_ARG)
                .help("Archive capacity")
                .long(ARCHIVE_MAX_ARG)
                .default_value("60"),
        )
        .arg(
            Arg::new(K_MAX_ARG)
                .help("Shake escalation ceiling")
                .long(K_MAX_ARG)
                .default_value("5"),
        )
        .arg(
            Arg::new(TIME_ARG)
                .help("Wall clock budget in seconds")
                .long(TIME_ARG)
                .short('t')
                .default_value("120"),
        )
        .arg(
            Arg::new(ITERATIONS_ARG)
                .help("Outer loop cap; unlimited when omitted")
                .long(ITERATIONS_ARG)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(IDLE_ARG)
                .help("Outer loops without improvement before stopping")
                .long(IDLE_ARG)
                .default_value("30"),
        )
        .arg(
            Arg::new(MODE_ARG)
                .help("Local search mode")
                .long(MODE_ARG)
                .value_parser(["pareto", "weighted"])
                .default_value("pareto"),
        )
        .arg(
            Arg::new(SEED_ARG)
                .help("Random seed for reproducible runs")
                .long(SEED_ARG)
                .short('s')
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(SNAPSHOT_ARG)
                .help("Outer loops between quality monitor snapshots")
                .long(SNAPSHOT_ARG)
                .default_value("10"),
        )
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[derive(Serialize)]
struct RunSummary {
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    iterations: usize,
    stop_reason: String,
    archive_size: usize,
    initial_size: usize,
}

fn parse_number<T: std::str::FromStr>(matches: &clap::ArgMatches, name: &str) -> Result<T, i32> {
    let raw = matches.get_one::<String>(name).expect("defaulted arg");
    raw.parse::<T>().map_err(|_| {
        tracing::error!("invalid value {:?} for --{}", raw, name);
        EXIT_INVALID_CONFIG
    })
}

fn build_config(matches: &clap::ArgMatches) -> Result<SolverConfig, i32> {
    let mut config = SolverConfig::default()
        .with_initial_solutions(parse_number(matches, INITIAL_ARG)?)
        .with_archive_max(parse_number(matches, ARCHIVE_MAX_ARG)?)
        .with_k_max(parse_number(matches, K_MAX_ARG)?)
        .with_max_time(Duration::from_secs(parse_number(matches, TIME_ARG)?))
        .with_idle_limit(parse_number(matches, IDLE_ARG)?)
        .with_snapshot_every(parse_number(matches, SNAPSHOT_ARG)?);

    if matches.contains_id(ITERATIONS_ARG) {
        config = config.with_max_iterations(Some(parse_number(matches, ITERATIONS_ARG)?));
    }
    if matches.contains_id(SEED_ARG) {
        config = config.with_seed(parse_number(matches, SEED_ARG)?);
    }
    let mode = matches
        .get_one::<String>(MODE_ARG)
        .expect("defaulted arg")
        .as_str();
    config = config.with_local_search_mode(match mode {
        "weighted" => LocalSearchMode::Weighted,
        _ => LocalSearchMode::Pareto,
    });

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        return Err(EXIT_INVALID_CONFIG);
    }
    Ok(config)
}

fn write_outputs(
    out_dir: &Path,
    problem: &tour_plan_model::prelude::Problem,
    outcome: &tour_plan_solver::engine::SolveOutcome,
    summary: &RunSummary,
) -> std::io::Result<()> {
    std::fs::create_dir_all(out_dir)?;

    let pareto_rows = report::population_rows(problem, outcome.archive.solutions().iter());
    report::write_itinerary_csv(
        BufWriter::new(File::create(out_dir.join("movns-pareto-set.csv"))?),
        &pareto_rows,
    )?;

    let initial_rows = report::population_rows(problem, outcome.initial.iter());
    report::write_itinerary_csv(
        BufWriter::new(File::create(out_dir.join("movns-initial-population.csv"))?),
        &initial_rows,
    )?;

    report::write_metrics_csv(
        BufWriter::new(File::create(out_dir.join("movns-metrics.csv"))?),
        &outcome.log,
    )?;

    let json = serde_json::to_string_pretty(summary).expect("serialize summary");
    std::fs::write(out_dir.join("run-summary.json"), json)?;
    Ok(())
}

fn real_main() -> i32 {
    enable_tracing();
    let matches = get_app().get_matches();

    let attractions = PathBuf::from(matches.get_one::<String>(ATTRACTIONS_ARG).unwrap());
    let hotels = PathBuf::from(matches.get_one::<String>(HOTELS_ARG).unwrap());
    let matrix_dir = PathBuf::from(matches.get_one::<String>(MATRIX_DIR_ARG).unwrap());
    let out_dir = PathBuf::from(matches.get_one::<String>(OUT_DIR_ARG).unwrap());

    let config = match build_config(&matches) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let problem = match ProblemLoader::default().from_paths(&attractions, &hotels, &matrix_dir) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("failed to load problem data: {}", e);
            return EXIT_MISSING_DATA;
        }
    };
    tracing::info!(
        attractions = problem.num_attractions(),
        hotels = problem.num_hotels(),
        "problem loaded"
    );

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let outcome = match MovnsDriver::new(&problem, config).solve() {
        Ok(o) => o,
        Err(SolverError::Config(e)) => {
            tracing::error!("{}", e);
            return EXIT_INVALID_CONFIG;
        }
        Err(SolverError::Data(e)) => {
            tracing::error!("{}", e);
            return EXIT_MISSING_DATA;
        }
        Err(SolverError::EmptyArchive) => {
            tracing::error!("no feasible seed solution could be constructed");
            return EXIT_NO_FEASIBLE_SEED;
        }
    };
    let runtime = t0.elapsed();

    tracing::info!(
        iterations = outcome.iterations,
        archive = outcome.archive.len(),
        runtime_ms = runtime.as_millis(),
        stop = %outcome.stop,
        "finished"
    );

    let summary = RunSummary {
        start_ts,
        end_ts: Utc::now(),
        runtime_ms: runtime.as_millis(),
        iterations: outcome.iterations,
        stop_reason: outcome.stop.to_string(),
        archive_size: outcome.archive.len(),
        initial_size: outcome.initial.len(),
    };

    if let Err(e) = write_outputs(&out_dir, &problem, &outcome, &summary) {
        tracing::error!("failed to write results to {}: {}", out_dir.display(), e);
        return 1;
    }
    tracing::info!("wrote results to {}", out_dir.display());
    EXIT_OK
}

fn main() {
    std::process::exit(real_main());
}
