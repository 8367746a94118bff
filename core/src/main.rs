use clap::Parser;
use log::{error, info};
use sonoscrub_core::cli::{Cli, OutputFormat};
use sonoscrub_core::{run_batch, BatchSummary, TextReport};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if !cli.source.is_dir() && cli.archives.is_none() {
        error!("{} is not a directory", cli.source.display());
        eprintln!("Error: {} is not a directory", cli.source.display());
        process::exit(1);
    }

    let config = cli.to_config();
    info!(
        "De-identifying {} into {}",
        config.source().display(),
        config.output().display()
    );

    let summary = match run_batch(&config) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Batch aborted: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_summary(&summary, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_summary(summary: &BatchSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
