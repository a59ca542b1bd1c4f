//! nmr-ingest - Decode NMR spectrum files into dense grids.
//!
//! This binary inspects, exports and probes NMRPipe, UCSF and text spectra.

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nmr_ingest::{
    config::{Cli, Command, ExportConfig, InspectConfig, InputArgs, ProbeConfig},
    detect_format, read_all_datasets, write_samples, DataBundle, Dataset, FileSource, Locator,
    Probe,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Inspect(config) => run_inspect(config),
        Command::Export(config) => run_export(config),
        Command::Probe(config) => run_probe(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "nmr_ingest=debug"
    } else {
        "nmr_ingest=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open and decode the input named by `args`.
fn decode(args: &InputArgs) -> Result<DataBundle, String> {
    let locator = args.locator()?;
    let source = FileSource::from_locator(&locator).map_err(|e| e.to_string())?;
    read_all_datasets(&source, &args.read_options()).map_err(|e| e.to_string())
}

// =============================================================================
// Inspect Command
// =============================================================================

fn run_inspect(config: InspectConfig) -> ExitCode {
    init_logging(config.input.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let bundle = match decode(&config.input) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("Failed to decode {}: {}", config.input.locator, e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        let summaries: Vec<_> = bundle.iter().map(Dataset::summary).collect();
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for dataset in bundle.iter() {
            print_dataset(dataset);
        }
    }

    ExitCode::SUCCESS
}

/// Print a human-readable dataset summary.
fn print_dataset(dataset: &Dataset) {
    println!("Source:  {}", dataset.source());
    println!("Kind:    {}", dataset.kind());
    println!(
        "Extents: {}",
        dataset
            .extents()
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(" x ")
    );

    println!();
    println!("Axes:");
    for (index, axis) in dataset.axes().iter().enumerate() {
        print!("  {}: {:<8} {:>6} points", index, axis.label, axis.size);
        if let Some(mhz) = axis.observe_mhz {
            print!(", {:.4} MHz", mhz);
        }
        if let Some(hz) = axis.sweep_width_hz {
            print!(", sw {:.2} Hz", hz);
        }
        println!();
    }

    if !dataset.provenance().is_empty() {
        println!();
        println!("Provenance:");
        for (key, value) in dataset.provenance().iter() {
            println!("  {}: {}", key, value);
        }
    }
}

// =============================================================================
// Export Command
// =============================================================================

fn run_export(config: ExportConfig) -> ExitCode {
    init_logging(config.input.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let bundle = match decode(&config.input) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("Failed to decode {}: {}", config.input.locator, e);
            return ExitCode::FAILURE;
        }
    };

    let Some(dataset) = bundle.first() else {
        error!("{} holds no datasets", config.input.locator);
        return ExitCode::FAILURE;
    };

    if let Err(e) = write_export(dataset, &config) {
        error!("Failed to write {}: {}", config.output.display(), e);
        return ExitCode::FAILURE;
    }

    info!(
        "Wrote {} {} cells to {}",
        dataset.extents().iter().product::<usize>(),
        dataset.kind(),
        config.output.display()
    );

    ExitCode::SUCCESS
}

fn write_export(dataset: &Dataset, config: &ExportConfig) -> Result<(), String> {
    let file = File::create(&config.output).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    write_samples(dataset.samples(), &mut writer, config.output_flavor())
        .map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}

// =============================================================================
// Probe Command
// =============================================================================

fn run_probe(config: ProbeConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let source = match Locator::parse(&config.locator).and_then(|l| FileSource::from_locator(&l)) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match detect_format(&source) {
        Ok(Probe::Matched(format)) => {
            println!("{}: {}", config.locator, format.name());
            ExitCode::SUCCESS
        }
        Ok(Probe::NotMatched) => {
            println!("{}: unrecognized", config.locator);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
