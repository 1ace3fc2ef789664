//! devtmpl CLI - Apply devcontainer templates.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Any propagated error

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devtmpl_templates::{generate_with_config, GenerateConfig};

/// Apply devcontainer templates to a workspace folder.
#[derive(Parser)]
#[command(name = "devtmpl")]
#[command(version, about = "Apply devcontainer templates to a workspace folder")]
#[command(long_about = r#"
devtmpl materializes a devcontainer template into a workspace folder,
substituting caller-supplied option values into the template's files.

The template source may be a local directory, a remote archive URL
(.tar, .tar.gz, .tgz, .zip), or an OCI registry reference such as
ghcr.io/devcontainers/templates/rust.
"#)]
struct Cli {
    /// Target workspace folder
    #[arg(short = 'w', long)]
    workspace_folder: PathBuf,

    /// Template source: local path, archive URL, or OCI reference
    #[arg(short = 't', long)]
    template_id: String,

    /// Template arguments as a JSON object string
    #[arg(short = 'a', long)]
    template_args: Option<String>,

    /// Directory to use for temporary files. If not provided, the system
    /// default will be used.
    #[arg(long)]
    tmp_dir: Option<PathBuf>,

    /// Keep temporary directories after execution
    #[arg(long)]
    keep_tmp_dir: bool,

    /// Use a local source directory in place instead of copying it to a
    /// temporary directory first
    #[arg(long)]
    in_place_local: bool,

    /// Glob pattern to remove from the materialized output (repeatable)
    #[arg(long = "omit-path", value_name = "GLOB")]
    omit_paths: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match EnvFilter::try_new(&cli.log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Error: invalid log level '{}': {}", cli.log_level, e);
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options: HashMap<String, String> = match &cli.template_args {
        Some(args) => serde_json::from_str(args).context("invalid template arguments JSON")?,
        None => HashMap::new(),
    };

    info!(
        template = %cli.template_id,
        workspace = %cli.workspace_folder.display(),
        ?options,
        "generating template"
    );

    let config = GenerateConfig {
        tmp_root: cli.tmp_dir,
        keep_tmp_dir: cli.keep_tmp_dir,
        omit_paths: cli.omit_paths,
        isolate_local_source: !cli.in_place_local,
    };

    generate_with_config(&cli.template_id, &cli.workspace_folder, options, config)
        .await
        .context("failed to generate template")?;

    info!("template generated successfully");
    Ok(())
}
