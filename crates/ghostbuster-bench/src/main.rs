use std::path::PathBuf;

use clap::Parser;

use ghostbuster_bench::config::{BenchmarkConfig, ResolvedOutputs};
use ghostbuster_bench::logging::init_event_log;
use ghostbuster_bench::runner::BenchmarkRunner;

/// Benchmarking harness for ghost-hunting bots.
#[derive(Debug, Parser)]
#[command(
    name = "ghostbuster-bench",
    author,
    version,
    about = "Deterministic ghost-hunt benchmark harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games each agent plays.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the per-game inquiry budget.
    #[arg(long, value_name = "COUNT")]
    max_inquiries: Option<u32>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(max_inquiries) = cli.max_inquiries {
        config.games.max_inquiries = max_inquiries;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let grid = config.game.grid_size;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({games} games on a {grid}x{grid} grid)",
        if agent_count == 1 { "" } else { "s" }
    );

    let runner = BenchmarkRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: benchmark execution skipped.");
        return Ok(());
    }

    let _event_log = init_event_log(&config, &outputs)?;

    let summary = runner.run()?;
    println!(
        "Benchmark complete for '{run_id}': {} games × {} agents → {} rows at {}",
        summary.games_played,
        summary.agents,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(events_path) = summary.events_path.as_ref() {
        println!("Event log: {}", events_path.display());
    }

    Ok(())
}
