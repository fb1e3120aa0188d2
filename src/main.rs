use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use genedots::{
    bail_assert,
    blueprint::Blueprint,
    experiment::{Experiment, FinishReason, Headless, Observer},
    util::{PopEvaluation, env, parse_log_level},
};
use tracing::{info, level_filters::LevelFilter, warn};

#[derive(Parser)]
#[clap(version)]
#[command(about = "Genedots - evolve a swarm of dots to find their way to a goal")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a template blueprint into the given directory
    Init {
        /// Directory to initialize in
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Run an experiment headless
    Run {
        /// Blueprint file
        #[arg(default_value = "genedots.toml")]
        blueprint: PathBuf,
        /// Override ga.num_generations
        #[arg(short, long)]
        generations: Option<usize>,
        /// Override ga.seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Print each generation's evaluation as a JSON line on stdout
        #[arg(long)]
        json: bool,
    },
    /// Validate a blueprint file
    Validate {
        /// Blueprint file
        #[arg(default_value = "genedots.toml")]
        blueprint: PathBuf,
    },
}

/// Prints evaluations as JSON lines
struct JsonLines;

impl Observer for JsonLines {
    fn on_generation(&mut self, evaluation: &PopEvaluation) {
        match serde_json::to_string(evaluation) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize evaluation: {}", e),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (log_level, bad_level) = match env("GENEDOTS_LOG") {
        Ok(level) => match parse_log_level(&level) {
            Some(filter) => (filter, None),
            None => (LevelFilter::INFO, Some(level)),
        },
        Err(_) => (LevelFilter::INFO, None),
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
    if let Some(level) = bad_level {
        warn!("Invalid log level: {}. Using default log level: INFO", level);
    }

    match args.command {
        Commands::Init { path } => {
            fs::create_dir_all(&path)?;
            let target = path.join("genedots.toml");
            bail_assert!(
                !target.exists(),
                "Blueprint `{}` already exists",
                target.display()
            );
            fs::write(&target, include_bytes!("../templates/genedots.toml"))
                .with_context(|| format!("Failed to write `{}`", target.display()))?;

            println!(
                "Initialized genedots blueprint in {}",
                path.canonicalize()?.display()
            );
        }
        Commands::Run {
            blueprint: bpath,
            generations,
            seed,
            json,
        } => {
            let mut blueprint = Blueprint::from_file(&bpath)?;
            if let Some(n) = generations {
                blueprint.ga.num_generations = n;
            }
            if seed.is_some() {
                blueprint.ga.seed = seed;
            }

            let reason = if json {
                Experiment::new(blueprint, JsonLines)?.run()?
            } else {
                Experiment::new(blueprint, Headless)?.run()?
            };
            if reason == FinishReason::Threshold {
                info!("✅ Fitness threshold reached");
            }
        }
        Commands::Validate { blueprint: bpath } => {
            let blueprint = Blueprint::from_file(&bpath)?;
            blueprint.validate()?;
            println!("✅ Blueprint `{}` is valid", bpath.display());
        }
    }

    Ok(())
}
