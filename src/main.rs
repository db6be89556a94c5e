use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use fibonacci::{
    telemetry::{self, TelemetryCollector},
    Fibonacci, GenerateArgs, GeneratorConfig, Handle,
};
use log::info;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[clap(about = "Print the N-th term of the sequence seeded by a and b")]
    Generate(GenerateArgs),
    #[clap(about = "Print terms 1 through N of the sequence seeded by a and b")]
    Sequence(GenerateArgs),
    #[clap(about = "Print the effective configuration as TOML")]
    Config {
        #[clap(long, help = "Path to a TOML configuration file")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => run("generate", args, false),
        Commands::Sequence(args) => run("sequence", args, true),
        Commands::Config { config } => {
            let config = GeneratorConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn run(command: &str, args: &GenerateArgs, list: bool) -> Result<()> {
    let mut telemetry =
        TelemetryCollector::new(command, args.a, args.b, args.n, args.enable_telemetry);

    let outcome = execute(args, list, &mut telemetry);
    if let Err(e) = &outcome {
        telemetry.record_error(&format!("{:#}", e));
    }

    // Save telemetry data even on failure
    telemetry::finish(telemetry, Path::new(&args.telemetry_output_path));
    outcome
}

fn execute(args: &GenerateArgs, list: bool, telemetry: &mut TelemetryCollector) -> Result<()> {
    let config_start = Instant::now();
    let config = args.apply(GeneratorConfig::load(args.config.as_deref())?);
    telemetry.record_config_load(config_start.elapsed(), config.policy(), config.max_value);

    info!(
        "Generating with {:?} policy, a={}, b={}, N={}",
        config.policy(),
        args.a,
        args.b,
        args.n
    );

    let construction_start = Instant::now();
    let generator = Fibonacci::with_config(args.a, args.b, &config)
        .context("Failed to construct generator")?;
    telemetry.record_construction(construction_start.elapsed());

    let mut handle = Handle::new(generator);
    let scope = handle.scope();

    let generation_start = Instant::now();
    let terms = if list {
        scope.sequence(args.n)
    } else {
        scope.generate(args.n).map(|term| vec![term])
    }
    .with_context(|| format!("Failed to generate term {}", args.n))?;
    telemetry.record_generation(generation_start.elapsed(), &terms);

    for term in &terms {
        println!("{}", term);
    }
    Ok(())
}
