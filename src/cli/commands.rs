//! Command execution for the jana-processor binary
//!
//! Resolves the working directory, loads every dataset in it, classifies
//! the reflections of modulated datasets, optionally exports their tables,
//! and prints a summary.

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::assembler::TableExporter;
use crate::cli::args::Args;
use crate::cli::selection::resolve_working_directory;
use crate::models::Dataset;
use crate::session::{JanaSession, LoadStats};

/// Outcome of a processing run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub directory: PathBuf,
    pub load: LoadStats,
    pub datasets: usize,
    pub classified: usize,
    pub exported: Vec<PathBuf>,
    pub export_failures: usize,
}

/// Set up structured logging
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jana_processor={}", log_level)));

    // Quiet runs get a compact line without the uptime column
    let compact = args.quiet.then(|| {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .compact()
    });
    let timed = (!args.quiet).then(|| {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(timed)
        .try_init()?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Run the processing pipeline for parsed arguments
pub fn run(args: &Args) -> Result<RunSummary> {
    let config = args.to_config();
    let search_root = std::env::current_dir().context("Failed to read current directory")?;

    let stdin = io::stdin();
    let directory = resolve_working_directory(
        args.directory.clone(),
        &search_root,
        &config.reflection_extension,
        !args.no_prompt,
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;

    let mut session = JanaSession::new(&directory, config)
        .with_context(|| format!("Failed to open {}", directory.display()))?;
    let load = session.load_all()?;

    if session.is_empty() {
        warn!("No JANA files found in {}", directory.display());
    }

    let axis = session.config().modulation_axis;
    let classified = if session.config().modulated {
        session.classify_all(axis)
    } else {
        0
    };

    let mut summary = RunSummary {
        directory,
        load,
        datasets: session.len(),
        classified,
        ..Default::default()
    };

    if let Some(destination) = &args.output {
        export_datasets(&session, args, destination, &mut summary);
    }

    if !args.quiet {
        print_summary(&session, &summary);
    }

    Ok(summary)
}

fn export_datasets(
    session: &JanaSession,
    args: &Args,
    destination: &Path,
    summary: &mut RunSummary,
) {
    let exportable: Vec<&Dataset> = session
        .datasets()
        .filter(|d| d.reflections.is_some())
        .collect();

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_progress_bar(exportable.len() as u64)
    };

    for dataset in exportable {
        pb.set_message(dataset.key.clone());
        let exporter = TableExporter::new(
            args.container_name(&dataset.key),
            Some(destination.to_path_buf()),
            args.format,
        );
        match session.export(&dataset.key, args.composite, &exporter) {
            Ok(paths) => summary.exported.extend(paths),
            Err(e) => {
                summary.export_failures += 1;
                warn!("Failed to export {}: {}", dataset.key, e);
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("export complete");
    info!(
        "Exported {} sheets to {}",
        summary.exported.len(),
        destination.display()
    );
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn print_summary(session: &JanaSession, summary: &RunSummary) {
    println!();
    println!(
        "{} {}",
        "JANA directory:".bright_green().bold(),
        summary.directory.display()
    );
    println!(
        "  {} datasets, {} files parsed, {} failed, {} reflections",
        summary.datasets.to_string().bright_cyan(),
        summary.load.files_processed,
        summary.load.files_failed.to_string().bright_red(),
        summary.load.reflections_parsed.to_string().bright_cyan()
    );
    println!();

    for dataset in session.datasets() {
        let ordinal = session.ordinal(&dataset.key).unwrap_or_default();
        println!(
            "  {}. {}",
            (ordinal + 1).to_string().bright_yellow().bold(),
            dataset.key.bright_cyan()
        );

        match (&dataset.reflections, &dataset.classified) {
            (Some(reflections), Some(classified)) => {
                let sizes: Vec<String> = classified
                    .families()
                    .iter()
                    .map(|f| format!("{} {}", f.len(), f.family.name()))
                    .collect();
                println!(
                    "     {} main, {} satellites; {}",
                    reflections.main.len(),
                    reflections.satellite.len(),
                    sizes.join(", ").bright_black()
                );
            }
            (Some(reflections), None) => println!(
                "     {} main, {} satellites",
                reflections.main.len(),
                reflections.satellite.len()
            ),
            (None, _) => println!("     {}", "no reflections".bright_black()),
        }

        if let Some(pattern) = &dataset.pattern {
            println!("     pattern: {} points", pattern.len());
        }
        if let Some(group) = dataset.structure.as_ref().and_then(|s| s.space_group.as_ref()) {
            println!("     space group: {}", group.symbol);
        }
    }

    if !summary.exported.is_empty() || summary.export_failures > 0 {
        println!();
        println!(
            "{} {} sheets written, {} datasets failed",
            "Export:".bright_green().bold(),
            summary.exported.len(),
            summary.export_failures
        );
    }
}
