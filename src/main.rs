use anyhow::Context;
use clap::Parser;
use std::process;
use tidal_analysis::cli::Args;
use tidal_analysis::models::AnalysisReport;
use tidal_analysis::processor::StationProcessor;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(run(args)) {
        Ok(_report) => {
            // Report already printed by the processor
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<AnalysisReport> {
    let processor = StationProcessor::new(args.station_path.clone(), args.constituents)
        .with_context(|| {
            format!(
                "failed to open station records at {}",
                args.station_path.display()
            )
        })?;

    Ok(processor.process().await?)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tidal_analysis={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
