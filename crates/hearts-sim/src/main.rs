use std::path::PathBuf;

use clap::Parser;

use hearts_sim::config::{ResolvedOutputs, SimConfig};
use hearts_sim::logging::init_logging;
use hearts_sim::runner::SimulationRunner;

/// Self-play harness for the Hearts strategy agents.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-sim",
    author,
    version,
    about = "Deterministic Hearts self-play simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let target = config.games.target_score;

    println!("Loaded configuration '{run_id}' ({games} games to {target} points)");

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SimulationRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Simulation complete for '{run_id}': {} games, {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Moons shot: {}", summary.moons_shot);
    for (name, wins) in &summary.wins {
        println!("  {name}: {wins} win{}", if *wins == 1 { "" } else { "s" });
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
