//! BDM group decision model CLI binary.
//!
//! # Commands
//!
//! - `run` - Simulate rounds and print the history (or a JSON report)
//! - `matrix` - Print the expected-utility matrix and pair quadrants
//! - `check` - Validate a roster and print its starting state

use std::path::{Path, PathBuf};

use anyhow::Context;
use bdm::{ActorId, Config, Model, Roster, RunReport, VERSION};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bdm")]
#[command(version = VERSION)]
#[command(about = "Expected-utility group decision model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate negotiation rounds
    Run {
        #[command(flatten)]
        model: ModelArgs,

        /// Print the full run report as JSON
        #[arg(long)]
        json: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the expected-utility matrix after a number of rounds
    Matrix {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Validate a roster
    Check {
        /// Roster file (JSON, or TOML by extension)
        roster: PathBuf,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Options shared by commands that build and run a model
#[derive(Args)]
struct ModelArgs {
    /// Roster file (JSON, or TOML by extension)
    roster: PathBuf,

    /// Config file path (default: <config dir>/bdm/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Status-quo weight (0.0 - 1.0)
    #[arg(long)]
    q: Option<f64>,

    /// Optimism weight (0.0 - 1.0)
    #[arg(long)]
    t: Option<f64>,

    /// Lower bound of the issue space
    #[arg(long, requires = "xmax")]
    xmin: Option<f64>,

    /// Upper bound of the issue space
    #[arg(long, requires = "xmin")]
    xmax: Option<f64>,

    /// Narrate every offer resolution
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            json,
            output,
        } => cmd_run(&model, json, output),

        Commands::Matrix { model } => cmd_matrix(&model),

        Commands::Check { roster, config } => cmd_check(&roster, config),
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// File config, then environment, then command-line flags
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let file = match path.or_else(|| Config::default_path().filter(|p| p.exists())) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    Ok(file.merge(Config::from_env()))
}

fn build_model(args: &ModelArgs) -> anyhow::Result<(Model, usize)> {
    let mut config = load_config(args.config.clone())?;

    if let Some(q) = args.q {
        config.model.q = q;
    }
    if let Some(t) = args.t {
        config.model.t = t;
    }
    if let (Some(xmin), Some(xmax)) = (args.xmin, args.xmax) {
        config.model = config.model.with_range(xmin, xmax);
    }
    if args.verbose {
        config.model = config.model.verbose();
    }
    let rounds = args.rounds.unwrap_or(config.run.rounds);

    let roster = Roster::from_file(&args.roster)
        .with_context(|| format!("loading roster {}", args.roster.display()))?;
    let model = Model::new(roster, config.model)?;

    Ok((model, rounds))
}

fn cmd_run(args: &ModelArgs, json: bool, output: Option<PathBuf>) -> anyhow::Result<()> {
    init_logging(args.verbose);

    let (mut model, rounds) = build_model(args)?;
    tracing::info!(actors = model.actors().len(), rounds, "starting run");

    // A failed round still leaves a readable history up to the failure.
    let outcome = model.run(rounds).map(|_| ());
    if let Err(e) = outcome {
        tracing::error!("{e}");
        if !json {
            print_history(&model);
        }
        write_report(&model.report(), json, output)?;
        return Err(e.into());
    }

    if !json {
        print_history(&model);
    }
    write_report(&model.report(), json, output)
}

fn write_report(report: &RunReport, json: bool, output: Option<PathBuf>) -> anyhow::Result<()> {
    if !json && output.is_none() {
        return Ok(());
    }
    let content = report.to_json()?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn print_history(model: &Model) {
    let names: Vec<&str> = model.actors().iter().map(|a| a.name()).collect();

    print!("{:>5}  {:>8}  {:>8}", "round", "mean", "median");
    for name in &names {
        print!("  {name:>10}");
    }
    println!();

    for record in model.history() {
        print!("{:>5}  {:>8.4}  {:>8.4}", record.round, record.mean, record.median);
        for x in &record.positions {
            print!("  {x:>10.4}");
        }
        println!();
    }
}

fn cmd_matrix(args: &ModelArgs) -> anyhow::Result<()> {
    init_logging(args.verbose);

    let (mut model, rounds) = build_model(args)?;
    model.run(rounds)?;

    let matrix = model.expected_utility_matrix();
    let names: Vec<&str> = model.actors().iter().map(|a| a.name()).collect();

    println!("Expected utility after {} rounds (row challenges column):", model.rounds_played());
    print!("{:>10}", "");
    for name in &names {
        print!("  {name:>10}");
    }
    println!();
    for (i, row) in matrix.rows().into_iter().enumerate() {
        print!("{:>10}", names[i]);
        for eu in row {
            print!("  {eu:>10.4}");
        }
        println!();
    }

    println!();
    println!("Quadrants:");
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if let Some(quadrant) = model.quadrant(ActorId(i), ActorId(j)) {
                println!("  {} vs {}: {quadrant}", names[i], names[j]);
            }
        }
    }
    Ok(())
}

fn cmd_check(roster_path: &Path, config: Option<PathBuf>) -> anyhow::Result<()> {
    init_logging(false);

    let config = load_config(config)?;
    let roster = Roster::from_file(roster_path)
        .with_context(|| format!("loading roster {}", roster_path.display()))?;
    let count = roster.len();
    let model = Model::new(roster, config.model)?;
    let (xmin, xmax) = model.range();

    println!("Roster OK: {count} actors");
    println!("  Range:   [{xmin}, {xmax}]");
    println!("  Mean:    {:.4}", model.mean_position());
    println!("  Median:  {:.4}", model.median_position());
    println!();
    println!("{:<16} {:>8} {:>8} {:>8}", "Actor", "Position", "Cap.", "Sal.");
    println!("{}", "-".repeat(43));
    for actor in model.actors() {
        println!(
            "{:<16} {:>8.4} {:>8.4} {:>8.4}",
            actor.name(),
            actor.x(),
            actor.c(),
            actor.s()
        );
    }
    Ok(())
}
