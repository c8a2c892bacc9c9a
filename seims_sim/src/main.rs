//! SEIMS module host CLI
//!
//! Runs one catalog module over a configured grid with deterministic forcing.

use clap::Parser;
use seims_core::ModuleKind;
use seims_sim::{run, DbEndpoint, HostError, HostSettings, LayeringMethod, ModelConfig};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// SEIMS single-module host
#[derive(Parser, Debug)]
#[command(name = "seims-sim")]
#[command(about = "Run a SEIMS module over a configured grid", long_about = None)]
struct Args {
    /// Model configuration file, or a directory containing model.json
    model_path: PathBuf,

    /// Worker threads for per-cell loops
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    threads: u32,

    /// Module layering method (0 = UP_DOWN, 1 = DOWN_UP)
    #[arg(default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    layering_method: u8,

    /// Scenario database host (IP address)
    #[arg(default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    db_host: IpAddr,

    /// Scenario database port
    #[arg(default_value_t = 27017, value_parser = clap::value_parser!(u16).range(1..))]
    db_port: u16,

    /// Scenario id (0 = base scenario)
    #[arg(default_value_t = 0)]
    scenario_id: u32,

    /// Override the configured number of steps
    #[arg(long)]
    steps: Option<usize>,

    /// Override the configured forcing seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the metadata document of the configured module and exit
    #[arg(long)]
    describe: bool,

    /// Print the module catalog as JSON and exit
    #[arg(long)]
    catalog: bool,

    /// Export per-step output statistics to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn catalog_json() -> serde_json::Value {
    let modules: Vec<serde_json::Value> = ModuleKind::all()
        .into_iter()
        .map(|kind| {
            let md = kind.metadata();
            serde_json::json!({
                "id": kind.id(),
                "name": md.name(),
                "class": md.class_name(),
                "description": md.description(),
                "version": md.version(),
            })
        })
        .collect();
    serde_json::json!({ "modules": modules })
}

fn execute(args: &Args) -> Result<(), HostError> {
    if args.catalog {
        println!("{}", serde_json::to_string_pretty(&catalog_json())?);
        return Ok(());
    }

    let mut config = ModelConfig::load(&args.model_path)?;
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    if args.describe {
        let kind: ModuleKind = config.module.parse()?;
        print!("{}", kind.metadata().xml_document());
        return Ok(());
    }

    let settings = HostSettings {
        threads: args.threads as usize,
        layering: LayeringMethod::from_ordinal(args.layering_method).unwrap_or_default(),
        db: DbEndpoint {
            host: args.db_host,
            port: args.db_port,
        },
        scenario_id: args.scenario_id,
    };

    if !args.json {
        info!("SEIMS module host v{}", env!("CARGO_PKG_VERSION"));
        info!("Model: {} ({})", config.name, args.model_path.display());
    }

    let (result, export) = run(&config, &settings)?;

    if let Some(path) = &args.export {
        export.write_to_file(path)?;
        info!("Exported {} frames to {}", export.frames.len(), path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for (key, stats) in &result.final_outputs {
            info!(
                "  {:<14} mean={:.3} min={:.3} max={:.3} total={:.3}",
                key, stats.mean, stats.min, stats.max, stats.total
            );
        }
        info!("✓ {} finished {} steps", result.module, result.steps);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if let Err(e) = execute(&args) {
        error!("✗ {}", e);
        std::process::exit(1);
    }
}
