// This is the primary entry point for the imgc command-line tool.
// The lib.rs file serves only as a public API for external consumers.

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use image_compressor::core::optimal_workers;
use image_compressor::intake;
use image_compressor::utils::format_file_size;
use image_compressor::{
    export_results, BatchSummary, CompressionSession, EntryStatus, ExportOptions, HandleRegistry,
    ImageTransformer, TransformConfig, TransformRequest,
};

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)         // Keep colored output
        .with_writer(std::io::stdout)
        .compact();              // Use compact formatter instead of pretty

    subscriber.init();

    // Parse CLI arguments.
    let config = match cli::Config::parse(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("For more information, try '--help'");
            return ExitCode::from(2);
        }
    };

    // Handle help flag.
    if config.help {
        println!("{}", cli::help_message());
        return ExitCode::SUCCESS;
    }

    // Handle version flag.
    if config.version {
        println!("{}", cli::version_message());
        return ExitCode::SUCCESS;
    }

    match run(config).await {
        // Exit with failure if any images failed.
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Runs one compression batch end to end; returns the number of failed entries.
async fn run(config: cli::Config) -> anyhow::Result<usize> {
    let started = Instant::now();

    let paths = collect_input_paths(&config.paths).await?;
    let intake = intake::load_sources(&paths, 0).await;

    for skipped in &intake.skipped {
        warn!("Skipping {}: {}", skipped.path.display(), skipped.reason);
    }
    if intake.accepted.is_empty() {
        anyhow::bail!("No supported images found");
    }

    let transform_config = TransformConfig {
        max_dimension: (config.max_dimension > 0).then_some(config.max_dimension),
        max_output_bytes: (config.max_size_mb > 0)
            .then(|| u64::from(config.max_size_mb) * 1024 * 1024),
        workers: config.jobs.unwrap_or_else(optimal_workers),
    };
    let transformer = ImageTransformer::new(transform_config)?;
    let registry = Arc::new(HandleRegistry::default());
    let mut session = CompressionSession::new(transformer, registry);
    session.add_sources(intake.accepted)?;

    info!(
        "Compressing {} image(s) at quality {}",
        session.len(),
        config.quality
    );

    let request = TransformRequest {
        target_format: config.format,
        quality: config.quality as f32 / 100.0,
    };
    session.process_pending(&request).await;

    for entry in session.entries() {
        match entry.status {
            EntryStatus::Completed => {
                if let Some(result) = &entry.result {
                    let outcome = if result.compression_ratio > 0 {
                        format!("{}% smaller", result.compression_ratio)
                    } else {
                        "no change".to_string()
                    };
                    info!(
                        "{}: {} → {} ({outcome})",
                        entry.source.name,
                        format_file_size(result.original_size),
                        format_file_size(result.output_size)
                    );
                }
            }
            EntryStatus::Error => {
                warn!(
                    "{}: {}",
                    entry.source.name,
                    entry.error.as_deref().unwrap_or("unknown error")
                );
            }
            _ => {}
        }
    }

    let options = ExportOptions {
        output_dir: config.output_dir,
        delay: (config.delay_ms > 0).then(|| Duration::from_millis(config.delay_ms)),
    };
    export_results(&session.completed(), &options).await?;

    let mut summary = BatchSummary::from_entries(session.entries());
    summary.set_elapsed(started.elapsed());

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("\n{summary}");
    }

    Ok(summary.failed)
}

/// Expands the CLI paths into a flat file list.
///
/// Directories are expanded one level deep; nested directories are ignored.
async fn collect_input_paths(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let metadata = tokio::fs::metadata(input)
            .await
            .with_context(|| format!("Cannot access {}", input.display()))?;

        if metadata.is_dir() {
            let mut dir = tokio::fs::read_dir(input)
                .await
                .with_context(|| format!("Cannot read directory {}", input.display()))?;
            let mut found = Vec::new();
            while let Some(dir_entry) = dir.next_entry().await? {
                if dir_entry.file_type().await?.is_file() {
                    found.push(dir_entry.path());
                }
            }
            // Directory listing order is not stable across platforms
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }

    Ok(paths)
}
