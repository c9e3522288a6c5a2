use anyhow::{bail, Result};
use std::env;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use registry_residency::{
    load_owner_rows, write_households, Pipeline, PipelineConfig, ResidencyLabel, VERSION,
};

const USAGE: &str = "usage: registry-residency process <input.csv> <output.csv> [--config <config.json>]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("process") => run_process(&args[2..]),
        Some("--version") => {
            println!("registry-residency {}", VERSION);
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn run_process(args: &[String]) -> Result<()> {
    let (input, output, config_path) = match args {
        [input, output] => (input, output, None),
        [input, output, flag, config] if flag == "--config" => (input, output, Some(config)),
        _ => bail!(USAGE),
    };

    let config = match config_path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    // 1. Load owner rows
    let rows = load_owner_rows(Path::new(input))?;

    // 2. Label + reconcile
    let pipeline = Pipeline::from_config(&config);
    let result = pipeline.run(rows);

    // 3. Export one row per household
    write_households(Path::new(output), &result.households)?;

    for label in ResidencyLabel::ALL {
        info!(
            label = label.as_str(),
            households = result.summary.residency_count(label),
            "residency"
        );
    }
    info!(processed_at = %result.processed_at, "{}", result.summary.summary());

    Ok(())
}
