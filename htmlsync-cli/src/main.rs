mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use htmlsync_edit::{SyncError, UpdateOptions, check_sync, read_standalone, update_firmware};
use htmlsync_render::{render_check_text, render_update_text};
use htmlsync_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "htmlsync",
    version,
    about = "Keep the standalone config page and its ESP32 firmware copy in sync."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify that the marked region of the page matches the firmware literal.
    Check(CheckArgs),
    /// Copy the whole standalone page into the firmware literal.
    Update(UpdateArgs),
}

#[derive(Debug, clap::Args)]
struct FileArgs {
    /// Repository root holding both files (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Standalone page (default: config_interface.html).
    #[arg(long)]
    standalone: Option<Utf8PathBuf>,

    /// Firmware source (default: swim_pacer.ino).
    #[arg(long)]
    firmware: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    #[command(flatten)]
    files: FileArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct UpdateArgs {
    #[command(flatten)]
    files: FileArgs,

    /// Print the firmware diff instead of writing it.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write the firmware file in place instead of through a temporary file.
    #[arg(long, default_value_t = false)]
    no_atomic: bool,

    /// Keep a copy of the firmware file before rewriting it.
    #[arg(long, default_value_t = false)]
    backup: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            println!("✗ Error: {:#}", e);
            let code = e
                .downcast_ref::<SyncError>()
                .map(SyncError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Update(args) => cmd_update(args),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args.files.repo_root;
    let file_config = config::load_or_default(&repo_root).context("load htmlsync.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_check_args(
        &repo_root,
        args.files.standalone.as_deref(),
        args.files.firmware.as_deref(),
    );

    debug!(
        "merged config: standalone={}, firmware={}, convention={:?}",
        merged.standalone, merged.firmware, merged.convention
    );

    let report = check_sync(
        &merged.standalone,
        &merged.firmware,
        &merged.convention,
        tool_info(),
    );

    match args.format {
        OutputFormat::Text => print!("{}", render_check_text(&report)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{}", json);
        }
    }

    Ok(if report.is_in_sync() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn cmd_update(args: UpdateArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args.files.repo_root;
    let file_config = config::load_or_default(&repo_root).context("load htmlsync.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_update_args(
        &repo_root,
        args.files.standalone.as_deref(),
        args.files.firmware.as_deref(),
        args.no_atomic,
        args.backup,
    );

    debug!(
        "merged config: standalone={}, firmware={}, atomic={}, backup_suffix={:?}",
        merged.standalone, merged.firmware, merged.atomic, merged.backup_suffix
    );

    println!("Extracting HTML content from standalone file...");
    let content = read_standalone(&merged.standalone)?;
    println!("Extracted {} characters", content.chars().count());

    println!("Updating ESP32 .ino file...");
    let opts = UpdateOptions {
        dry_run: args.dry_run,
        atomic: merged.atomic,
        backup_suffix: merged.backup_suffix,
    };
    let (report, patch) = update_firmware(
        &merged.standalone,
        &content,
        &merged.firmware,
        &merged.convention,
        tool_info(),
        &opts,
    )?;

    if opts.dry_run {
        print!("{}", patch);
    }
    print!("{}", render_update_text(&report));
    Ok(ExitCode::SUCCESS)
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "htmlsync".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
