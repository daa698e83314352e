mod cli;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dvd2mp4_core::converter::TranscodeProgress;
use dvd2mp4_core::{
    default_combined_output, discover_groups, load_config, plan_units, validate_config, Config,
    Converter, FailurePolicy, FfmpegConverter, OutputMode, PipelineProcessor, RunReport,
};

use cli::Cli;

/// Exit status after Ctrl-C, as shells report SIGINT.
const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Buffer size for the progress channel
const PROGRESS_BUFFER_SIZE: usize = 64;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Load configuration
    let mut config = match &cli.config {
        Some(path) => load_config(Some(path.as_path()))
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => load_config(None).context("Failed to load configuration")?,
    };
    apply_cli_overrides(&mut config, &cli);

    validate_config(&config).context("Configuration validation failed")?;
    debug!("Configuration: {:?}", config);

    // Discover title sets
    let groups = discover_groups(&cli.input).await?;
    if groups.is_empty() {
        warn!(
            "No VOB groups found in {}, nothing to do",
            cli.input.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    for group in &groups {
        info!(
            "Found {} ({} file{})",
            group.prefix,
            group.segments.len(),
            if group.segments.len() == 1 { "" } else { "s" }
        );
    }

    // Check external tools
    let converter = FfmpegConverter::new(config.converter.clone());
    converter
        .validate()
        .await
        .context("Required external tools are not available")?;
    info!("Using converter: {}", converter.name());

    let mode = output_mode(&cli, &config).await?;
    let units = plan_units(&groups, &mode);

    let processor = PipelineProcessor::new(config.processor.clone(), converter);

    let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let progress_handle = tokio::spawn(log_progress(progress_rx));

    let report = tokio::select! {
        report = processor.run(&units, Some(progress_tx)) => report,
        _ = signal::ctrl_c() => {
            warn!("Interrupted, removing temporary files");
            return Ok(ExitCode::from(INTERRUPTED_EXIT_CODE));
        }
    };

    let _ = progress_handle.await;

    log_summary(&report);

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// CLI flags win over file and environment configuration.
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref path) = cli.ffmpeg {
        config.converter.ffmpeg_path = path.clone();
    }
    if let Some(ref path) = cli.ffprobe {
        config.converter.ffprobe_path = path.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.converter.timeout_secs = Some(timeout);
    }
    if cli.verbose {
        config.converter.echo_commands = true;
    }

    if let Some(ref dir) = cli.output_dir {
        config.processor.output_dir = dir.clone();
    }
    if let Some(ref dir) = cli.temp_dir {
        config.processor.temp_dir = Some(dir.clone());
    }
    if let Some(ref aspect) = cli.aspect {
        config.processor.aspect = Some(aspect.clone());
    }
    if cli.fail_fast {
        config.processor.failure_policy = FailurePolicy::Abort;
    }
}

async fn output_mode(cli: &Cli, config: &Config) -> Result<OutputMode> {
    if cli.split {
        if let Some(ref output) = cli.output {
            warn!(
                "--output {} is ignored in split mode, use --output-dir",
                output.display()
            );
        }
        return Ok(OutputMode::Split {
            output_dir: config.processor.output_dir.clone(),
        });
    }

    let output_path = match &cli.output {
        Some(path) => path.clone(),
        None => {
            // Canonicalize so "." and trailing slashes still yield a folder name
            let input = tokio::fs::canonicalize(&cli.input)
                .await
                .unwrap_or_else(|_| cli.input.clone());
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            default_combined_output(&input, &cwd)
        }
    };

    Ok(OutputMode::Combined { output_path })
}

async fn log_progress(mut rx: mpsc::Receiver<TranscodeProgress>) {
    while let Some(progress) = rx.recv().await {
        debug!(
            unit = %progress.job_id,
            speed = progress.speed.as_deref().unwrap_or("?"),
            "⏳ {:.1}s encoded",
            progress.time_secs
        );
    }
}

fn log_summary(report: &RunReport) {
    let summary = format!(
        "{} converted, {} skipped, {} failed",
        report.converted_count(),
        report.skipped_count(),
        report.failed_count()
    );

    if report.is_success() {
        info!("Done: {}", summary);
    } else if report.aborted {
        error!("Aborted: {}", summary);
    } else {
        error!("Finished with errors: {}", summary);
    }
}
